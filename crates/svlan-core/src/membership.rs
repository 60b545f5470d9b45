//! VLAN port-membership engine.
//!
//! Every operation reads live device state, computes new masks locally
//! and writes them back. There is no caching and no locking: two
//! concurrent mutations of the same VLAN race, and the last writer
//! wins. Callers needing concurrency safety must serialize per
//! `(switch, vlan)` externally.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use svlan_snmp::{oid, value, SetValue, SnmpTransport, SnmpValue};

use crate::error::{validate_vlan_id, SwitchError, SwitchResult};
use crate::mask::PortMask;
use crate::portset::PortSet;
use crate::session::SwitchSession;

/// How a port forwards a VLAN's traffic on egress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tagging {
    /// Frames leave with the 802.1Q tag.
    Tagged,
    /// Frames leave untagged.
    Untagged,
}

impl Tagging {
    /// Returns the mode name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tagging::Tagged => "tagged",
            Tagging::Untagged => "untagged",
        }
    }
}

impl fmt::Display for Tagging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership operations for the VLANs of one switch session.
///
/// Obtained via [`SwitchSession::membership`]; borrows the session for
/// its lifetime.
pub struct VlanMembership<'a, T: SnmpTransport> {
    session: &'a SwitchSession<T>,
}

impl<'a, T: SnmpTransport> VlanMembership<'a, T> {
    pub(crate) fn new(session: &'a SwitchSession<T>) -> Self {
        Self { session }
    }

    /// Enumerates the VLAN ids configured on the switch by walking the
    /// static-name column and taking each instance's trailing index.
    pub async fn list_vlans(&self) -> SwitchResult<BTreeSet<u16>> {
        let pairs = self
            .session
            .transport()
            .walk(
                self.session.ip(),
                self.session.read_only_community(),
                oid::VLAN_STATIC_NAME,
            )
            .await
            .map_err(|e| SwitchError::transport("list_vlans", &e))?;

        Ok(pairs
            .iter()
            .filter_map(|(instance, _)| oid::trailing_index(instance))
            .collect())
    }

    /// True if the VLAN's row is present: its tagged-mask GET succeeds
    /// with a value. Transport failures count as "not present".
    pub async fn vlan_exists(&self, vlan_id: u16) -> SwitchResult<bool> {
        validate_vlan_id(vlan_id)?;
        Ok(matches!(
            self.fetch_mask(vlan_id, Tagging::Tagged).await,
            Ok(Some(_))
        ))
    }

    /// Reads both masks for a VLAN. `Ok(None)` means the VLAN is absent
    /// (either mask missing); transport failures are errors.
    pub async fn read_membership(
        &self,
        vlan_id: u16,
    ) -> SwitchResult<Option<(PortMask, PortMask)>> {
        validate_vlan_id(vlan_id)?;
        let tagged = self.fetch_mask(vlan_id, Tagging::Tagged).await?;
        let untagged = self.fetch_mask(vlan_id, Tagging::Untagged).await?;
        match (tagged, untagged) {
            (Some(tagged), Some(untagged)) => Ok(Some((tagged, untagged))),
            _ => Ok(None),
        }
    }

    /// Adds ports to a VLAN's tagged or untagged membership.
    ///
    /// Read-modify-write against one table only: tagged membership goes
    /// to the egress mask, untagged membership to the untagged mask.
    /// One SET per call; no rollback is ever needed within a call.
    #[instrument(skip(self, ports), fields(ports = %ports))]
    pub async fn add_ports(
        &self,
        ports: &PortSet,
        vlan_id: u16,
        tagging: Tagging,
    ) -> SwitchResult<()> {
        validate_vlan_id(vlan_id)?;
        ports.ensure_within(self.session.port_count())?;

        let (tagged, untagged) = self.require_membership(vlan_id).await?;
        debug!(vlan_id, tagged = %tagged, untagged = %untagged, "membership before add");

        let current = match tagging {
            Tagging::Tagged => tagged,
            Tagging::Untagged => untagged,
        };
        let context = format!("add_ports vlan {} ports {} ({})", vlan_id, ports, tagging);
        // Encode at the device mask's width; some firmware reports
        // masks wider than ceil(port_count/8). A mask too narrow for
        // the requested ports would silently drop them, so it is
        // rejected as a malformed reply instead.
        if let Some(max) = ports.max_port() {
            let needed = usize::from(max - 1) / 8 + 1;
            if current.len() < needed {
                return Err(SwitchError::Transport {
                    context,
                    message: format!(
                        "device mask is {} bytes, too narrow for port {}",
                        current.len(),
                        max
                    ),
                    partial: false,
                });
            }
        }
        let merged = current.merge(&PortMask::encode(ports, current.len()));

        let instance = match tagging {
            Tagging::Tagged => oid::vlan_egress(vlan_id),
            Tagging::Untagged => oid::vlan_untagged(vlan_id),
        };
        self.write_mask(&instance, &merged, &context, false).await?;

        info!(vlan_id, %ports, mode = %tagging, "ports added to VLAN");
        Ok(())
    }

    /// Removes ports from both of a VLAN's membership tables: untagged
    /// first, then tagged.
    ///
    /// The two writes are independent. If the first succeeds and the
    /// second fails the VLAN is left half-updated (ports gone from
    /// untagged, still tagged); that outcome is surfaced as a transport
    /// error flagged partial, distinct from a clean failure.
    #[instrument(skip(self, ports), fields(ports = %ports))]
    pub async fn remove_ports(&self, ports: &PortSet, vlan_id: u16) -> SwitchResult<()> {
        validate_vlan_id(vlan_id)?;
        ports.ensure_within(self.session.port_count())?;

        let (tagged, untagged) = self.require_membership(vlan_id).await?;
        debug!(vlan_id, tagged = %tagged, untagged = %untagged, "membership before remove");

        let new_untagged = untagged.subtract(&PortMask::encode(ports, untagged.len()));
        let new_tagged = tagged.subtract(&PortMask::encode(ports, tagged.len()));

        let context = format!("remove_ports vlan {} ports {}", vlan_id, ports);
        self.write_mask(
            &oid::vlan_untagged(vlan_id),
            &new_untagged,
            &format!("{} (untagged table)", context),
            false,
        )
        .await?;
        self.write_mask(
            &oid::vlan_egress(vlan_id),
            &new_tagged,
            &format!("{} (tagged table)", context),
            true,
        )
        .await?;

        info!(vlan_id, %ports, "ports removed from VLAN");
        Ok(())
    }

    /// Reads both masks and converts absence into [`SwitchError::VlanAbsent`].
    pub(crate) async fn require_membership(
        &self,
        vlan_id: u16,
    ) -> SwitchResult<(PortMask, PortMask)> {
        match self.read_membership(vlan_id).await? {
            Some(masks) => Ok(masks),
            None => Err(SwitchError::VlanAbsent { vlan_id }),
        }
    }

    /// GETs one mask. `Ok(None)` for a missing instance, error for
    /// transport failure or an unparsable reply.
    pub(crate) async fn fetch_mask(
        &self,
        vlan_id: u16,
        which: Tagging,
    ) -> SwitchResult<Option<PortMask>> {
        let instance = match which {
            Tagging::Tagged => oid::vlan_egress(vlan_id),
            Tagging::Untagged => oid::vlan_untagged(vlan_id),
        };
        let context = format!("read {} mask of vlan {}", which, vlan_id);

        let reply = self
            .session
            .transport()
            .get(
                self.session.ip(),
                self.session.read_only_community(),
                &instance,
            )
            .await
            .map_err(|e| SwitchError::transport(&context, &e))?;

        match value::parse_reply(&reply) {
            Some(SnmpValue::Hex(bytes)) => Ok(Some(PortMask::from_bytes(bytes))),
            Some(SnmpValue::Absent) => Ok(None),
            _ => Err(SwitchError::malformed_reply(&context, &reply)),
        }
    }

    async fn write_mask(
        &self,
        instance: &str,
        mask: &PortMask,
        context: &str,
        partial_on_failure: bool,
    ) -> SwitchResult<()> {
        self.session
            .transport()
            .set(
                self.session.ip(),
                self.session.read_write_community(),
                instance,
                SetValue::HexString(mask.to_hex()),
            )
            .await
            .map_err(|e| {
                if partial_on_failure {
                    SwitchError::transport_partial(context, &e)
                } else {
                    SwitchError::transport(context, &e)
                }
            })
    }
}
