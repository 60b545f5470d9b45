//! Error types for switch session operations.
//!
//! One enum covers the four failure classes: validation (no device
//! contact), auth (community probe), transport (a GET/SET/WALK failed or
//! replied with garbage) and state (the device's VLAN table conflicts
//! with the requested operation). Mask-width mismatches are deliberately
//! NOT here — pairing masks from different switches is a programming
//! error and panics.

use std::fmt;
use thiserror::Error;

use svlan_snmp::SnmpError;

/// Result type alias for switch session operations.
pub type SwitchResult<T> = Result<T, SwitchError>;

/// Which community string an auth failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityKind {
    /// The read-only community.
    ReadOnly,
    /// The read-write community.
    ReadWrite,
}

impl CommunityKind {
    /// Returns the community kind name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityKind::ReadOnly => "read-only",
            CommunityKind::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for CommunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The probe phase in which a read-write auth check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// The initial GET failed.
    Read,
    /// The write-back SET failed.
    Write,
}

impl AuthPhase {
    /// Returns the phase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPhase::Read => "read",
            AuthPhase::Write => "write",
        }
    }
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by switch session operations.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// A port-spec token failed validation. Never involves the device.
    #[error("invalid port spec token '{token}': {reason} (valid ports: 1-{max_port})")]
    InvalidPortSpec {
        /// The offending token as entered.
        token: String,
        /// Why it was rejected.
        reason: String,
        /// Highest valid port on this switch.
        max_port: u16,
    },

    /// A VLAN id outside `1..=4094`. Never involves the device.
    #[error("invalid VLAN id {vlan_id}: must be between 1 and 4094")]
    InvalidVlanId {
        /// The rejected id.
        vlan_id: u16,
    },

    /// A community probe failed during session bootstrap.
    #[error("{community} community check failed ({phase} phase): {message}")]
    Auth {
        /// Which community was being probed.
        community: CommunityKind,
        /// Which probe phase failed.
        phase: AuthPhase,
        /// Underlying transport failure.
        message: String,
    },

    /// A transport call failed or returned an unparsable reply.
    /// `partial` marks operations where an earlier write had already
    /// succeeded, leaving the device in a half-applied state.
    #[error("SNMP failure during {context}: {message}")]
    Transport {
        /// What the session was doing (operation, VLAN, ports).
        context: String,
        /// Underlying failure description.
        message: String,
        /// True if a prior write in the same operation succeeded.
        partial: bool,
    },

    /// The VLAN does not exist on the device.
    #[error("VLAN {vlan_id} does not exist on the switch")]
    VlanAbsent {
        /// The missing VLAN id.
        vlan_id: u16,
    },

    /// The VLAN already exists; creation refused.
    #[error("VLAN {vlan_id} already exists on the switch")]
    VlanExists {
        /// The conflicting VLAN id.
        vlan_id: u16,
    },

    /// The VLAN still has member ports; deletion refused.
    #[error("VLAN {vlan_id} still has member ports; remove them before deleting")]
    VlanNotEmpty {
        /// The non-empty VLAN id.
        vlan_id: u16,
    },

    /// The row never materialized after createAndGo.
    #[error("VLAN {vlan_id} not visible {waited_ms} ms after create")]
    CreateTimedOut {
        /// The VLAN id being created.
        vlan_id: u16,
        /// How long the controller polled before giving up.
        waited_ms: u64,
    },
}

impl SwitchError {
    /// Creates a validation error for a port-spec token.
    pub fn invalid_port_spec(
        token: impl Into<String>,
        reason: impl Into<String>,
        max_port: u16,
    ) -> Self {
        Self::InvalidPortSpec {
            token: token.into(),
            reason: reason.into(),
            max_port,
        }
    }

    /// Wraps a transport failure with operation context.
    pub fn transport(context: impl Into<String>, source: &SnmpError) -> Self {
        Self::Transport {
            context: context.into(),
            message: source.to_string(),
            partial: false,
        }
    }

    /// Wraps a transport failure that left the device half-updated.
    pub fn transport_partial(context: impl Into<String>, source: &SnmpError) -> Self {
        Self::Transport {
            context: context.into(),
            message: source.to_string(),
            partial: true,
        }
    }

    /// Wraps an unparsable reply with operation context.
    pub fn malformed_reply(context: impl Into<String>, reply: &str) -> Self {
        Self::Transport {
            context: context.into(),
            message: format!("unparsable reply: {:?}", reply),
            partial: false,
        }
    }

    /// Creates an auth error from a transport failure.
    pub fn auth(community: CommunityKind, phase: AuthPhase, source: &SnmpError) -> Self {
        Self::Auth {
            community,
            phase,
            message: source.to_string(),
        }
    }

    /// True if the operation completed some writes before failing.
    pub fn is_partial(&self) -> bool {
        matches!(self, SwitchError::Transport { partial: true, .. })
    }
}

/// Checks a VLAN id against the 802.1Q range.
pub fn validate_vlan_id(vlan_id: u16) -> SwitchResult<()> {
    if (1..=4094).contains(&vlan_id) {
        Ok(())
    } else {
        Err(SwitchError::InvalidVlanId { vlan_id })
    }
}
