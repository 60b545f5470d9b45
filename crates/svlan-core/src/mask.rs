//! Fixed-width port bitmask codec and mask algebra.
//!
//! The dot1q static table stores VLAN membership as a byte string: bit
//! `7 - ((port-1) % 8)` of byte `(port-1) / 8` is port `port`. All
//! algebra requires equal-width operands; masks from switches with
//! different port counts must never be mixed, and mixing them is a
//! programming error that panics rather than a recoverable failure.

use std::fmt;

use svlan_snmp::value;

use crate::portset::PortSet;

/// An ordered, fixed-width byte mask of port membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMask {
    bytes: Vec<u8>,
}

impl PortMask {
    /// Creates an all-zero mask of the given byte width.
    pub fn zero(mask_len: usize) -> Self {
        Self {
            bytes: vec![0; mask_len],
        }
    }

    /// Wraps raw octets read from the device.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Sets exactly the bits for the given ports, all else zero. Port 0
    /// and ports beyond the mask width are skipped; parsing bounds them
    /// earlier.
    pub fn encode(ports: &PortSet, mask_len: usize) -> Self {
        let mut mask = Self::zero(mask_len);
        for port in ports.iter() {
            if port == 0 {
                continue;
            }
            let byte = usize::from(port - 1) / 8;
            if byte < mask.bytes.len() {
                mask.bytes[byte] |= 1 << (7 - ((port - 1) % 8));
            }
        }
        mask
    }

    /// Recovers the port set from the mask's set bits.
    pub fn decode(&self) -> PortSet {
        let mut ports = Vec::new();
        for (byte_index, byte) in self.bytes.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << (7 - bit)) != 0 {
                    ports.push((byte_index * 8 + bit) as u16 + 1);
                }
            }
        }
        PortSet::from_ports(ports)
    }

    /// Bytewise OR — adds `other`'s membership to `self`.
    pub fn merge(&self, other: &PortMask) -> PortMask {
        self.zip_with(other, |a, b| a | b)
    }

    /// Bytewise `self AND (NOT other)` — removes `other`'s membership.
    pub fn subtract(&self, other: &PortMask) -> PortMask {
        self.zip_with(&other.complement(), |a, b| a & b)
    }

    /// Bytewise XOR with `0xFF`.
    pub fn complement(&self) -> PortMask {
        PortMask {
            bytes: self.bytes.iter().map(|b| b ^ 0xFF).collect(),
        }
    }

    /// True if the mask holds the given port's bit.
    pub fn contains(&self, port: u16) -> bool {
        if port == 0 {
            return false;
        }
        let byte = usize::from(port - 1) / 8;
        self.bytes
            .get(byte)
            .is_some_and(|b| b & (1 << (7 - ((port - 1) % 8))) != 0)
    }

    /// True if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// The mask width in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-width mask (never produced by a valid session).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Renders the space-separated hex form used for SNMP SETs.
    pub fn to_hex(&self) -> String {
        value::format_hex_octets(&self.bytes)
    }

    fn zip_with(&self, other: &PortMask, f: impl Fn(u8, u8) -> u8) -> PortMask {
        assert_eq!(
            self.bytes.len(),
            other.bytes.len(),
            "port mask width mismatch: {} vs {} bytes (masks from different switches?)",
            self.bytes.len(),
            other.bytes.len()
        );
        PortMask {
            bytes: self
                .bytes
                .iter()
                .zip(&other.bytes)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        }
    }
}

impl fmt::Display for PortMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ports(list: impl IntoIterator<Item = u16>) -> PortSet {
        PortSet::from_ports(list)
    }

    #[test]
    fn test_encode_bit_mapping() {
        // 24 ports -> 3 mask bytes.
        assert_eq!(
            PortMask::encode(&ports([1, 2, 3, 4]), 3).as_bytes(),
            &[0xF0, 0x00, 0x00]
        );
        assert_eq!(PortMask::encode(&ports([8]), 3).as_bytes(), &[0x01, 0x00, 0x00]);
        assert_eq!(PortMask::encode(&ports([9]), 3).as_bytes(), &[0x00, 0x80, 0x00]);
        assert_eq!(PortMask::encode(&ports([24]), 3).as_bytes(), &[0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for set in [
            ports([]),
            ports([1]),
            ports([1, 8, 9, 24]),
            ports([2, 3, 5, 7, 11, 13, 17, 19, 23]),
        ] {
            assert_eq!(PortMask::encode(&set, 3).decode(), set);
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let m = PortMask::encode(&ports([1, 9]), 3);
        assert_eq!(m.merge(&m), m);
    }

    #[test]
    fn test_merge_and_subtract() {
        let base = PortMask::encode(&ports([1, 2]), 3);
        let added = PortMask::encode(&ports([9, 24]), 3);

        let merged = base.merge(&added);
        assert_eq!(merged.decode(), ports([1, 2, 9, 24]));

        // Add-then-remove of disjoint ports restores the original.
        assert_eq!(merged.subtract(&added), base);
    }

    #[test]
    fn test_complement() {
        let m = PortMask::from_bytes(vec![0xF0, 0x00, 0x01]);
        assert_eq!(m.complement().as_bytes(), &[0x0F, 0xFF, 0xFE]);
        assert_eq!(m.complement().complement(), m);
    }

    #[test]
    fn test_contains() {
        let m = PortMask::encode(&ports([1, 9, 24]), 3);
        assert!(m.contains(1));
        assert!(m.contains(9));
        assert!(m.contains(24));
        assert!(!m.contains(2));
        assert!(!m.contains(0));
        assert!(!m.contains(25));
        assert!(!m.contains(200));
    }

    #[test]
    fn test_is_zero() {
        assert!(PortMask::zero(3).is_zero());
        assert!(!PortMask::encode(&ports([5]), 3).is_zero());
    }

    #[test]
    fn test_hex_rendering() {
        let m = PortMask::encode(&ports([1, 2, 3, 4]), 3);
        assert_eq!(m.to_hex(), "F0 00 00");
        assert_eq!(m.to_string(), "F0 00 00");
    }

    #[test]
    #[should_panic(expected = "port mask width mismatch")]
    fn test_width_mismatch_panics() {
        let a = PortMask::zero(3);
        let b = PortMask::zero(8);
        let _ = a.merge(&b);
    }

    #[test]
    fn test_encode_skips_port_zero() {
        // Port numbering starts at 1; a stray 0 in a directly built set
        // must not underflow the bit math.
        let m = PortMask::encode(&ports([0, 1]), 3);
        assert_eq!(m.decode(), ports([1]));
    }

    #[test]
    fn test_encode_skips_bits_beyond_width() {
        // Mirrors the device-width guard: bits past the mask end are
        // dropped, not wrapped.
        let m = PortMask::encode(&ports([1, 30]), 3);
        assert_eq!(m.decode(), ports([1]));
    }
}
