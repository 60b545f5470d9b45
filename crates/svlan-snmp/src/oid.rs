//! OID constants and builders for the system group and the dot1q VLAN
//! static table.

/// sysDescr — device model/description string.
pub const SYS_DESCR: &str = ".1.3.6.1.2.1.1.1.0";

/// sysName — administratively assigned device name.
pub const SYS_NAME: &str = ".1.3.6.1.2.1.1.5.0";

/// ifNumber — total interface count, including management interfaces.
pub const IF_NUMBER: &str = ".1.3.6.1.2.1.2.1.0";

/// dot1qVlanStaticName column (indexed by VLAN id).
pub const VLAN_STATIC_NAME: &str = ".1.3.6.1.2.1.17.7.1.4.3.1.1";

/// dot1qVlanStaticEgressPorts column — the tagged/egress port mask.
pub const VLAN_STATIC_EGRESS: &str = ".1.3.6.1.2.1.17.7.1.4.3.1.2";

/// dot1qVlanStaticUntaggedPorts column — the untagged port mask.
pub const VLAN_STATIC_UNTAGGED: &str = ".1.3.6.1.2.1.17.7.1.4.3.1.4";

/// dot1qVlanStaticRowStatus column — VLAN lifecycle control.
pub const VLAN_STATIC_ROW_STATUS: &str = ".1.3.6.1.2.1.17.7.1.4.3.1.5";

/// RowStatus value that creates and activates a row in one step.
pub const ROW_STATUS_CREATE_AND_GO: i32 = 4;

/// RowStatus value that destroys a row.
pub const ROW_STATUS_DESTROY: i32 = 6;

/// Returns the static-name OID for one VLAN.
pub fn vlan_name(vlan_id: u16) -> String {
    format!("{}.{}", VLAN_STATIC_NAME, vlan_id)
}

/// Returns the tagged/egress mask OID for one VLAN.
pub fn vlan_egress(vlan_id: u16) -> String {
    format!("{}.{}", VLAN_STATIC_EGRESS, vlan_id)
}

/// Returns the untagged mask OID for one VLAN.
pub fn vlan_untagged(vlan_id: u16) -> String {
    format!("{}.{}", VLAN_STATIC_UNTAGGED, vlan_id)
}

/// Returns the row-status OID for one VLAN.
pub fn vlan_row_status(vlan_id: u16) -> String {
    format!("{}.{}", VLAN_STATIC_ROW_STATUS, vlan_id)
}

/// Extracts the trailing numeric index of an OID, e.g. the VLAN id from
/// a static-table column instance.
pub fn trailing_index(oid: &str) -> Option<u16> {
    oid.rsplit('.').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_oids() {
        assert_eq!(vlan_name(100), ".1.3.6.1.2.1.17.7.1.4.3.1.1.100");
        assert_eq!(vlan_egress(100), ".1.3.6.1.2.1.17.7.1.4.3.1.2.100");
        assert_eq!(vlan_untagged(1), ".1.3.6.1.2.1.17.7.1.4.3.1.4.1");
        assert_eq!(vlan_row_status(4094), ".1.3.6.1.2.1.17.7.1.4.3.1.5.4094");
    }

    #[test]
    fn test_trailing_index() {
        assert_eq!(trailing_index(".1.3.6.1.2.1.17.7.1.4.3.1.1.100"), Some(100));
        assert_eq!(trailing_index(".1.3.6.1.2.1.17.7.1.4.3.1.1.1"), Some(1));
        assert_eq!(trailing_index("not-an-oid"), None);
        assert_eq!(trailing_index(".1.3.6.1.2.1.17.7.1.4.3.1.1.notnum"), None);
    }
}
