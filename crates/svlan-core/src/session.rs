//! Switch session: the composition root.
//!
//! A session binds one switch address to one credential pair and one
//! injected transport. Construction validates both communities and
//! resolves the port topology; everything downstream trusts those
//! results. Sessions hold no VLAN state — the switch is the only
//! durable store, and every operation reads it fresh.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use svlan_snmp::{oid, value, SnmpTransport, SnmpValue};

use crate::auth;
use crate::config::SwitchConfig;
use crate::error::SwitchResult;
use crate::lifecycle::VlanLifecycle;
use crate::membership::{Tagging, VlanMembership};
use crate::portset::PortSet;
use crate::topology::{self, PortCountSource};

/// Static facts about the switch behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchInfo {
    /// sysName, if the device answered.
    pub name: Option<String>,
    /// sysDescr (model string), if the device answered.
    pub model: Option<String>,
    /// Usable port count.
    pub port_count: u16,
    /// Port mask width in bytes.
    pub mask_len: usize,
}

/// One VLAN a port belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortVlanEntry {
    /// The VLAN id.
    pub vlan_id: u16,
    /// How the port egresses this VLAN's traffic.
    pub tagging: Tagging,
}

/// All VLAN memberships of one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortVlanReport {
    /// The port number.
    pub port: u16,
    /// Its memberships, ascending by VLAN id.
    pub vlans: Vec<PortVlanEntry>,
}

/// An authenticated session against one switch.
///
/// Immutable after bootstrap; cheap to keep for the duration of a
/// request, discarded afterwards.
pub struct SwitchSession<T: SnmpTransport> {
    ip: IpAddr,
    config: SwitchConfig,
    transport: T,
    port_count: u16,
    mask_len: usize,
    port_count_source: PortCountSource,
}

impl<T: SnmpTransport> SwitchSession<T> {
    /// Bootstraps a session: verifies the read-only and read-write
    /// communities (the latter with a real write), then resolves the
    /// port topology. Any community failure aborts construction.
    #[instrument(skip(config, transport))]
    pub async fn connect(ip: IpAddr, config: SwitchConfig, transport: T) -> SwitchResult<Self> {
        auth::verify_read_only(&transport, ip, &config.read_only_community).await?;
        auth::verify_read_write(&transport, ip, &config.read_write_community).await?;

        let (port_count, port_count_source) =
            topology::resolve_port_count(&transport, ip, &config.read_only_community).await;
        let mask_len = usize::from(port_count.div_ceil(8));

        if port_count_source == PortCountSource::DefaultFallback {
            warn!(%ip, port_count, "session running on fallback port count; range checks are a guess");
        }
        info!(%ip, port_count, mask_len, "switch session established");

        Ok(Self {
            ip,
            config,
            transport,
            port_count,
            mask_len,
            port_count_source,
        })
    }

    /// The switch address this session talks to.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Usable port count resolved at bootstrap.
    pub fn port_count(&self) -> u16 {
        self.port_count
    }

    /// Port mask width in bytes (`ceil(port_count / 8)`).
    pub fn mask_len(&self) -> usize {
        self.mask_len
    }

    /// Whether the port count came from the device or the fail-open
    /// default.
    pub fn port_count_source(&self) -> PortCountSource {
        self.port_count_source
    }

    /// Parses a port spec against this switch's port count. Pure; never
    /// contacts the device.
    pub fn parse_ports(&self, spec: &str) -> SwitchResult<PortSet> {
        PortSet::parse(spec, self.port_count)
    }

    /// Membership operations (read/add/remove ports, enumerate VLANs).
    pub fn membership(&self) -> VlanMembership<'_, T> {
        VlanMembership::new(self)
    }

    /// Lifecycle operations (create/delete VLANs).
    pub fn lifecycle(&self) -> VlanLifecycle<'_, T> {
        VlanLifecycle::new(self)
    }

    /// Reads the switch's identity. Best effort: a field the device
    /// will not answer for is simply `None`.
    pub async fn switch_info(&self) -> SwitchInfo {
        SwitchInfo {
            name: self.get_system_string(oid::SYS_NAME).await,
            model: self.get_system_string(oid::SYS_DESCR).await,
            port_count: self.port_count,
            mask_len: self.mask_len,
        }
    }

    /// Reports every VLAN each spec'd port belongs to, untagged
    /// membership taking precedence over tagged. VLANs whose masks
    /// cannot be read are skipped, not fatal.
    pub async fn port_vlans(&self, spec: &str) -> SwitchResult<Vec<PortVlanReport>> {
        let ports = self.parse_ports(spec)?;
        let membership = self.membership();

        let mut tables = Vec::new();
        for vlan_id in membership.list_vlans().await? {
            match membership.read_membership(vlan_id).await {
                Ok(Some(masks)) => tables.push((vlan_id, masks)),
                Ok(None) => continue,
                Err(e) => {
                    debug!(vlan_id, error = %e, "skipping unreadable VLAN in port report");
                    continue;
                }
            }
        }

        let reports = ports
            .iter()
            .map(|port| {
                let vlans = tables
                    .iter()
                    .filter_map(|(vlan_id, (tagged, untagged))| {
                        if untagged.contains(port) {
                            Some(PortVlanEntry {
                                vlan_id: *vlan_id,
                                tagging: Tagging::Untagged,
                            })
                        } else if tagged.contains(port) {
                            Some(PortVlanEntry {
                                vlan_id: *vlan_id,
                                tagging: Tagging::Tagged,
                            })
                        } else {
                            None
                        }
                    })
                    .collect();
                PortVlanReport { port, vlans }
            })
            .collect();

        Ok(reports)
    }

    async fn get_system_string(&self, instance: &str) -> Option<String> {
        let reply = self
            .transport
            .get(self.ip, &self.config.read_only_community, instance)
            .await
            .ok()?;
        match value::parse_reply(&reply) {
            Some(SnmpValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn read_only_community(&self) -> &str {
        &self.config.read_only_community
    }

    pub(crate) fn read_write_community(&self) -> &str {
        &self.config.read_write_community
    }
}

/// Community strings are elided; sessions end up in error and log
/// output.
impl<T: SnmpTransport> fmt::Debug for SwitchSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchSession")
            .field("ip", &self.ip)
            .field("port_count", &self.port_count)
            .field("mask_len", &self.mask_len)
            .field("port_count_source", &self.port_count_source)
            .finish_non_exhaustive()
    }
}
