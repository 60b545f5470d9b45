//! Parser for the tagged textual SNMP reply forms.
//!
//! The transport hands back display-format strings; this module turns
//! them into typed values. Unknown forms parse to `None` so callers can
//! treat them as malformed replies rather than guessing.

use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^INTEGER:\s*(-?\d+)\s*$").expect("invalid INTEGER pattern"));

static GAUGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Gauge32:\s*(\d+)\s*$").expect("invalid Gauge32 pattern"));

static STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^STRING:\s*"(.*)"\s*$"#).expect("invalid STRING pattern"));

static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^Hex-STRING:\s*([0-9A-Fa-f]{2}(?:\s+[0-9A-Fa-f]{2})*)\s*$")
        .expect("invalid Hex-STRING pattern")
});

/// A parsed SNMP reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpValue {
    /// `INTEGER: n`
    Integer(i64),
    /// `Gauge32: n`
    Gauge(u64),
    /// `STRING: "s"`
    Str(String),
    /// `Hex-STRING: xx xx ...`
    Hex(Vec<u8>),
    /// `No Such Object` / `No Such Instance` — the request reached the
    /// device but the object is not present.
    Absent,
}

impl SnmpValue {
    /// Returns the integer payload, if this is an `INTEGER` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `STRING` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnmpValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the octets, if this is a `Hex-STRING` value.
    pub fn as_hex(&self) -> Option<&[u8]> {
        match self {
            SnmpValue::Hex(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns true for missing-instance replies.
    pub fn is_absent(&self) -> bool {
        matches!(self, SnmpValue::Absent)
    }
}

/// Parses one textual reply. Returns `None` for forms this module does
/// not recognize.
pub fn parse_reply(reply: &str) -> Option<SnmpValue> {
    let reply = reply.trim();

    if reply.starts_with("No Such Object") || reply.starts_with("No Such Instance") {
        return Some(SnmpValue::Absent);
    }
    if let Some(caps) = INTEGER_RE.captures(reply) {
        return caps[1].parse().ok().map(SnmpValue::Integer);
    }
    if let Some(caps) = GAUGE_RE.captures(reply) {
        return caps[1].parse().ok().map(SnmpValue::Gauge);
    }
    if let Some(caps) = STRING_RE.captures(reply) {
        return Some(SnmpValue::Str(caps[1].to_string()));
    }
    if let Some(caps) = HEX_RE.captures(reply) {
        return parse_hex_octets(&caps[1]).map(SnmpValue::Hex);
    }

    None
}

/// Parses a space-separated hex octet payload (`"F0 00 00"`).
/// Long masks may wrap across lines; any whitespace separates octets.
pub fn parse_hex_octets(payload: &str) -> Option<Vec<u8>> {
    let mut bytes = Vec::new();
    for octet in payload.split_whitespace() {
        if octet.len() != 2 {
            return None;
        }
        bytes.push(u8::from_str_radix(octet, 16).ok()?);
    }
    if bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}

/// Renders octets as the space-separated uppercase hex form SNMP SET
/// expects (`"F0 00 00"`).
pub fn format_hex_octets(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_reply("INTEGER: 28"), Some(SnmpValue::Integer(28)));
        assert_eq!(parse_reply("INTEGER: -1"), Some(SnmpValue::Integer(-1)));
        assert_eq!(parse_reply("INTEGER:  5 "), Some(SnmpValue::Integer(5)));
    }

    #[test]
    fn test_parse_gauge() {
        assert_eq!(
            parse_reply("Gauge32: 1000000000"),
            Some(SnmpValue::Gauge(1_000_000_000))
        );
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse_reply("STRING: \"sw-lab-3\""),
            Some(SnmpValue::Str("sw-lab-3".to_string()))
        );
        assert_eq!(
            parse_reply("STRING: \"\""),
            Some(SnmpValue::Str(String::new()))
        );
    }

    #[test]
    fn test_parse_hex_string() {
        assert_eq!(
            parse_reply("Hex-STRING: F0 00 00"),
            Some(SnmpValue::Hex(vec![0xF0, 0x00, 0x00]))
        );
        // Long masks wrap; whitespace between octets may include newlines.
        assert_eq!(
            parse_reply("Hex-STRING: FF FF FF 00\n00 00 00 00"),
            Some(SnmpValue::Hex(vec![0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0]))
        );
    }

    #[test]
    fn test_parse_absent() {
        assert_eq!(
            parse_reply("No Such Instance currently exists at this OID"),
            Some(SnmpValue::Absent)
        );
        assert_eq!(
            parse_reply("No Such Object available on this agent at this OID"),
            Some(SnmpValue::Absent)
        );
        assert!(parse_reply("No Such Instance currently exists at this OID")
            .unwrap()
            .is_absent());
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(parse_reply(""), None);
        assert_eq!(parse_reply("Timeout: No Response"), None);
        assert_eq!(parse_reply("INTEGER: abc"), None);
        assert_eq!(parse_reply("Hex-STRING: F"), None);
        assert_eq!(parse_reply("Hex-STRING: GG 00"), None);
    }

    #[test]
    fn test_hex_octets_roundtrip() {
        let bytes = vec![0xF0, 0x00, 0x00];
        assert_eq!(format_hex_octets(&bytes), "F0 00 00");
        assert_eq!(parse_hex_octets("F0 00 00"), Some(bytes));
        assert_eq!(parse_hex_octets("f0 0a"), Some(vec![0xF0, 0x0A]));
        assert_eq!(parse_hex_octets(""), None);
        assert_eq!(parse_hex_octets("F00"), None);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(SnmpValue::Integer(28).as_integer(), Some(28));
        assert_eq!(SnmpValue::Str("x".into()).as_integer(), None);
        assert_eq!(SnmpValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(
            SnmpValue::Hex(vec![1, 2]).as_hex(),
            Some(&[1u8, 2u8][..])
        );
    }
}
