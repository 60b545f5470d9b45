//! Port specification parsing.
//!
//! Human-entered specs are comma-separated tokens, each a single port
//! (`5`) or an inclusive range (`1-4`). Parsing validates every token
//! against the switch's port count and never contacts the device.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{SwitchError, SwitchResult};

/// An ascending, de-duplicated set of port numbers in `[1, port_count]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet {
    ports: BTreeSet<u16>,
}

impl PortSet {
    /// Parses a port spec (`"1-4"`, `"1,2,3"`, `"1-3,5"`) against the
    /// switch's port count. Fails on the first offending token.
    pub fn parse(spec: &str, port_count: u16) -> SwitchResult<Self> {
        let mut ports = BTreeSet::new();

        for token in spec.split(',') {
            let token = token.trim();
            let (start, end) = parse_token(token, port_count)?;
            ports.extend(start..=end);
        }

        Ok(Self { ports })
    }

    /// Builds a set directly from port numbers. Range validation against
    /// a switch happens at the membership engine boundary.
    pub fn from_ports(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
        }
    }

    /// Iterates the ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    /// Number of ports in the set.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// True if the set holds no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// True if the set holds the given port.
    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    /// Highest port in the set, if any.
    pub fn max_port(&self) -> Option<u16> {
        self.ports.iter().next_back().copied()
    }

    /// Rejects sets that reach beyond the switch's ports. Guards
    /// directly constructed sets at the engine boundary.
    pub(crate) fn ensure_within(&self, port_count: u16) -> SwitchResult<()> {
        if self.contains(0) {
            return Err(SwitchError::invalid_port_spec(
                "0",
                "port out of range",
                port_count,
            ));
        }
        if let Some(max) = self.max_port() {
            if max > port_count {
                return Err(SwitchError::invalid_port_spec(
                    max.to_string(),
                    "port out of range",
                    port_count,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PortSet {
    /// Renders the ports comma-separated, for log context.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for port in &self.ports {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", port)?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<u16> for PortSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self::from_ports(iter)
    }
}

/// Parses one token into its inclusive `(start, end)` port range.
fn parse_token(token: &str, port_count: u16) -> SwitchResult<(u16, u16)> {
    if token.is_empty() {
        return Err(SwitchError::invalid_port_spec(
            token,
            "empty token",
            port_count,
        ));
    }

    let (start, end) = match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_port(start.trim(), token, port_count)?;
            let end = parse_port(end.trim(), token, port_count)?;
            if start > end {
                return Err(SwitchError::invalid_port_spec(
                    token,
                    "inverted range",
                    port_count,
                ));
            }
            (start, end)
        }
        None => {
            let port = parse_port(token, token, port_count)?;
            (port, port)
        }
    };

    if start < 1 || end > port_count {
        return Err(SwitchError::invalid_port_spec(
            token,
            "port out of range",
            port_count,
        ));
    }

    Ok((start, end))
}

fn parse_port(text: &str, token: &str, port_count: u16) -> SwitchResult<u16> {
    text.parse()
        .map_err(|_| SwitchError::invalid_port_spec(token, "not a number", port_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_range() {
        let set = PortSet::parse("1-4", 24).unwrap();
        assert_eq!(set, PortSet::from_ports([1, 2, 3, 4]));
    }

    #[test]
    fn test_parse_mixed_and_deduplicated() {
        let set = PortSet::parse("1-3,5,2", 24).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.max_port(), Some(5));
    }

    #[test]
    fn test_parse_single_with_whitespace() {
        let set = PortSet::parse(" 7 , 9 ", 24).unwrap();
        assert_eq!(set, PortSet::from_ports([7, 9]));
    }

    #[test]
    fn test_out_of_range_single() {
        let err = PortSet::parse("5", 4).unwrap_err();
        match err {
            SwitchError::InvalidPortSpec {
                token,
                reason,
                max_port,
            } => {
                assert_eq!(token, "5");
                assert_eq!(reason, "port out of range");
                assert_eq!(max_port, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_end_of_range() {
        assert!(PortSet::parse("20-30", 24).is_err());
        assert!(PortSet::parse("0", 24).is_err());
        assert!(PortSet::parse("0-4", 24).is_err());
    }

    #[test]
    fn test_inverted_range() {
        let err = PortSet::parse("4-2", 24).unwrap_err();
        assert!(matches!(
            err,
            SwitchError::InvalidPortSpec { ref reason, .. } if reason == "inverted range"
        ));
    }

    #[test]
    fn test_not_numeric() {
        assert!(PortSet::parse("a", 24).is_err());
        assert!(PortSet::parse("2-a", 24).is_err());
        assert!(PortSet::parse("1,x,3", 24).is_err());
    }

    #[test]
    fn test_empty_specs() {
        assert!(PortSet::parse("", 24).is_err());
        assert!(PortSet::parse("  ", 24).is_err());
        assert!(PortSet::parse("1,,3", 24).is_err());
    }

    #[test]
    fn test_display() {
        let set = PortSet::parse("3,1-2", 24).unwrap();
        assert_eq!(set.to_string(), "1,2,3");
    }

    #[test]
    fn test_ensure_within() {
        let set = PortSet::from_ports([1, 25]);
        assert!(set.ensure_within(24).is_err());
        assert!(set.ensure_within(28).is_ok());
    }
}
