//! The transport collaborator contract.
//!
//! The core never speaks SNMP itself; it drives an implementation of
//! [`SnmpTransport`] and parses the textual replies it hands back. The
//! trait mirrors the net-snmp command-line surface: one GET, SET or WALK
//! per call, plaintext community authentication, display-format replies.

use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

/// Result type alias for transport operations.
pub type SnmpResult<T> = Result<T, SnmpError>;

/// The SNMP operation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnmpOp {
    /// Single-object GET.
    Get,
    /// Single-object SET.
    Set,
    /// Subtree WALK.
    Walk,
}

impl SnmpOp {
    /// Returns the operation name as used in log and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SnmpOp::Get => "GET",
            SnmpOp::Set => "SET",
            SnmpOp::Walk => "WALK",
        }
    }
}

impl fmt::Display for SnmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-level failure: timeout, network error, device refusal,
/// or anything else that prevented a reply from coming back.
#[derive(Debug, Clone, Error)]
#[error("SNMP {op} {oid} on {ip} failed: {message}")]
pub struct SnmpError {
    /// The operation that failed.
    pub op: SnmpOp,
    /// Target device address.
    pub ip: String,
    /// The OID (or WALK prefix) that was being accessed.
    pub oid: String,
    /// Transport-specific failure description.
    pub message: String,
}

impl SnmpError {
    /// Creates a transport error for the given operation.
    pub fn new(
        op: SnmpOp,
        ip: impl Into<String>,
        oid: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            op,
            ip: ip.into(),
            oid: oid.into(),
            message: message.into(),
        }
    }
}

/// A typed value for an SNMP SET, tagged the way the net-snmp tools
/// tag them on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    /// `i` — a signed integer (row status values, admin states).
    Integer(i32),
    /// `s` — an octet string (names, contact strings).
    OctetString(String),
    /// `x` — a hex string of space-separated octets (port masks).
    HexString(String),
}

impl SetValue {
    /// Returns the net-snmp type tag character for this value.
    pub fn type_tag(&self) -> char {
        match self {
            SetValue::Integer(_) => 'i',
            SetValue::OctetString(_) => 's',
            SetValue::HexString(_) => 'x',
        }
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetValue::Integer(n) => write!(f, "{}", n),
            SetValue::OctetString(s) | SetValue::HexString(s) => f.write_str(s),
        }
    }
}

/// Contract for the injected SNMP collaborator.
///
/// Replies are the textual display forms (`INTEGER: 28`,
/// `STRING: "sw-lab-3"`, `Hex-STRING: F0 00 00`); parsing them is the
/// caller's job via [`crate::value`]. A `Result::Err` means the request
/// itself failed (timeout, unreachable, bad community); a reply that
/// indicates a missing object still comes back as `Ok` and parses to
/// [`crate::value::SnmpValue::Absent`].
///
/// Implementations must be `Send + Sync`; one instance may serve many
/// sessions, and the core issues at most one call at a time per
/// operation.
#[async_trait]
pub trait SnmpTransport: Send + Sync {
    /// Reads a single object.
    async fn get(&self, ip: IpAddr, community: &str, oid: &str) -> SnmpResult<String>;

    /// Writes a single object.
    async fn set(&self, ip: IpAddr, community: &str, oid: &str, value: SetValue)
        -> SnmpResult<()>;

    /// Enumerates a subtree, returning `(oid, reply)` pairs in device
    /// order.
    async fn walk(
        &self,
        ip: IpAddr,
        community: &str,
        oid_prefix: &str,
    ) -> SnmpResult<Vec<(String, String)>>;
}

/// A shared transport handle is itself a transport; one implementation
/// may serve many sessions.
#[async_trait]
impl<T: SnmpTransport + ?Sized> SnmpTransport for std::sync::Arc<T> {
    async fn get(&self, ip: IpAddr, community: &str, oid: &str) -> SnmpResult<String> {
        (**self).get(ip, community, oid).await
    }

    async fn set(
        &self,
        ip: IpAddr,
        community: &str,
        oid: &str,
        value: SetValue,
    ) -> SnmpResult<()> {
        (**self).set(ip, community, oid, value).await
    }

    async fn walk(
        &self,
        ip: IpAddr,
        community: &str,
        oid_prefix: &str,
    ) -> SnmpResult<Vec<(String, String)>> {
        (**self).walk(ip, community, oid_prefix).await
    }
}
