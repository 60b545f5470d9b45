//! Port-count resolution.
//!
//! The usable port count drives every range check and the mask width,
//! so it is resolved once at session bootstrap. Resolution fails open:
//! if the device will not answer or answers garbage, the session runs
//! with a default of 24 ports so read operations stay usable, and the
//! fallback is recorded so callers know range validation is a guess.

use std::net::IpAddr;

use tracing::{debug, warn};

use svlan_snmp::{oid, value, SnmpTransport, SnmpValue};

/// Fail-open port count used when ifNumber cannot be resolved.
pub const DEFAULT_PORT_COUNT: u16 = 24;

/// Interfaces assumed to be management/reserved (the first two).
pub const RESERVED_IF_COUNT: u16 = 2;

/// Where the session's port count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortCountSource {
    /// Derived from the device's ifNumber reply.
    Reported,
    /// ifNumber failed or was unparsable; [`DEFAULT_PORT_COUNT`] in use.
    DefaultFallback,
}

/// Resolves the usable port count: ifNumber minus the reserved
/// management interfaces, or the fail-open default.
pub(crate) async fn resolve_port_count<T: SnmpTransport>(
    transport: &T,
    ip: IpAddr,
    community: &str,
) -> (u16, PortCountSource) {
    let reply = match transport.get(ip, community, oid::IF_NUMBER).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(%ip, error = %e, "ifNumber query failed; falling back to {} ports", DEFAULT_PORT_COUNT);
            return (DEFAULT_PORT_COUNT, PortCountSource::DefaultFallback);
        }
    };

    // An ifNumber that does not fit u16 is as unusable as garbage.
    let total = match value::parse_reply(&reply) {
        Some(SnmpValue::Integer(total)) => u16::try_from(total).ok(),
        _ => None,
    };
    match total {
        Some(total) if total > RESERVED_IF_COUNT => {
            let port_count = total - RESERVED_IF_COUNT;
            debug!(%ip, total, port_count, "resolved port count from ifNumber");
            (port_count, PortCountSource::Reported)
        }
        _ => {
            warn!(%ip, reply, "unusable ifNumber reply; falling back to {} ports", DEFAULT_PORT_COUNT);
            (DEFAULT_PORT_COUNT, PortCountSource::DefaultFallback)
        }
    }
}
