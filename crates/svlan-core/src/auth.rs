//! Community credential probes.
//!
//! Both probes run once during session bootstrap and gate everything
//! after them. The read-write probe performs a real SET (writing sysName
//! back unchanged): session validity must prove write access, not just
//! read access, so this is deliberately not a pure read.

use std::net::IpAddr;

use tracing::debug;

use svlan_snmp::{oid, value, SetValue, SnmpTransport, SnmpValue};

use crate::error::{AuthPhase, CommunityKind, SwitchError, SwitchResult};

/// Probes the read-only community with a sysDescr GET.
pub(crate) async fn verify_read_only<T: SnmpTransport>(
    transport: &T,
    ip: IpAddr,
    community: &str,
) -> SwitchResult<()> {
    transport
        .get(ip, community, oid::SYS_DESCR)
        .await
        .map_err(|e| SwitchError::auth(CommunityKind::ReadOnly, AuthPhase::Read, &e))?;
    debug!(%ip, "read-only community verified");
    Ok(())
}

/// Probes the read-write community: GET sysName, then SET the same
/// value back unchanged. Both steps must succeed; the error records
/// which phase failed.
pub(crate) async fn verify_read_write<T: SnmpTransport>(
    transport: &T,
    ip: IpAddr,
    community: &str,
) -> SwitchResult<()> {
    let reply = transport
        .get(ip, community, oid::SYS_NAME)
        .await
        .map_err(|e| SwitchError::auth(CommunityKind::ReadWrite, AuthPhase::Read, &e))?;

    // Write the decoded string payload back, not the display form.
    let current = match value::parse_reply(&reply) {
        Some(SnmpValue::Str(s)) => s,
        _ => reply.trim().to_string(),
    };

    transport
        .set(ip, community, oid::SYS_NAME, SetValue::OctetString(current))
        .await
        .map_err(|e| SwitchError::auth(CommunityKind::ReadWrite, AuthPhase::Write, &e))?;
    debug!(%ip, "read-write community verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svlan_snmp::MockTransport;

    fn ip() -> IpAddr {
        "10.2.0.65".parse().unwrap()
    }

    #[tokio::test]
    async fn test_read_only_ok() {
        let mock = MockTransport::new();
        mock.on_get(oid::SYS_DESCR, "STRING: \"DGS-1210-28\"");
        assert!(verify_read_only(&mock, ip(), "public").await.is_ok());
    }

    #[tokio::test]
    async fn test_read_only_failure() {
        let mock = MockTransport::new();
        mock.on_get_error(oid::SYS_DESCR, "timeout");

        let err = verify_read_only(&mock, ip(), "public").await.unwrap_err();
        assert!(matches!(
            err,
            SwitchError::Auth {
                community: CommunityKind::ReadOnly,
                phase: AuthPhase::Read,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_read_write_sets_value_back_unchanged() {
        let mock = MockTransport::new();
        mock.on_get(oid::SYS_NAME, "STRING: \"sw-lab-3\"");

        verify_read_write(&mock, ip(), "private").await.unwrap();

        let calls = mock.set_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].oid, oid::SYS_NAME);
        assert_eq!(calls[0].community, "private");
        assert_eq!(calls[0].value, SetValue::OctetString("sw-lab-3".to_string()));
    }

    #[tokio::test]
    async fn test_read_write_read_phase_failure() {
        let mock = MockTransport::new();
        mock.on_get_error(oid::SYS_NAME, "no response");

        let err = verify_read_write(&mock, ip(), "private").await.unwrap_err();
        assert!(matches!(
            err,
            SwitchError::Auth {
                community: CommunityKind::ReadWrite,
                phase: AuthPhase::Read,
                ..
            }
        ));
        // The write must not have been attempted.
        assert!(mock.set_calls().is_empty());
    }

    #[tokio::test]
    async fn test_read_write_write_phase_failure() {
        let mock = MockTransport::new();
        mock.on_get(oid::SYS_NAME, "STRING: \"sw-lab-3\"");
        mock.fail_set(oid::SYS_NAME, "read-only community");

        let err = verify_read_write(&mock, ip(), "public").await.unwrap_err();
        assert!(matches!(
            err,
            SwitchError::Auth {
                phase: AuthPhase::Write,
                ..
            }
        ));
    }
}
