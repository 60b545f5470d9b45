//! SNMP transport seam for svlan.
//!
//! This crate owns everything wire-adjacent that the VLAN core depends
//! on without implementing the SNMP protocol itself:
//!
//! - [`SnmpTransport`]: the injected collaborator contract (GET/SET/WALK
//!   against one device, textual replies)
//! - [`value`]: parser for the tagged textual reply forms
//!   (`INTEGER: n`, `STRING: "s"`, `Hex-STRING: ..`, `Gauge32: n`)
//! - [`oid`]: the dot1q VLAN static table and system OIDs
//! - [`mock`]: a scripted in-memory transport for test suites

pub mod mock;
pub mod oid;
pub mod transport;
pub mod value;

pub use mock::{MockTransport, SetCall};
pub use transport::{SetValue, SnmpError, SnmpOp, SnmpResult, SnmpTransport};
pub use value::SnmpValue;
