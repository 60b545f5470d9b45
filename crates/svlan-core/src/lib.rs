//! svlan-core - VLAN port-membership management for SNMP-managed switches.
//!
//! Drives the dot1q VLAN static table of a managed switch over an
//! injected [`SnmpTransport`](svlan_snmp::SnmpTransport): VLAN
//! creation/deletion, tagged and untagged port membership, and port
//! reports. All operations go through a [`SwitchSession`], which
//! validates both community strings and resolves the switch's port
//! topology before handing out the membership and lifecycle engines.
//!
//! Membership mutations are read-modify-write with no device-side
//! locking; concurrent writers to the same VLAN race and the last
//! writer wins. Serialize per `(switch, vlan)` externally if that
//! matters for your deployment.

mod auth;
mod config;
mod error;
mod lifecycle;
mod mask;
mod membership;
mod portset;
mod session;
mod topology;

pub use config::SwitchConfig;
pub use error::{AuthPhase, CommunityKind, SwitchError, SwitchResult};
pub use lifecycle::{SettleOptions, VlanLifecycle};
pub use mask::PortMask;
pub use membership::{Tagging, VlanMembership};
pub use portset::PortSet;
pub use session::{PortVlanEntry, PortVlanReport, SwitchInfo, SwitchSession};
pub use topology::{PortCountSource, DEFAULT_PORT_COUNT};
