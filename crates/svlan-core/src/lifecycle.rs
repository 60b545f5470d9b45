//! VLAN lifecycle controller.
//!
//! Creation and deletion drive the dot1q static-table row status. The
//! device materializes a new row asynchronously, so creation polls for
//! the row on a bounded schedule instead of trusting a blind delay.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use svlan_snmp::{oid, SetValue, SnmpTransport};

use crate::error::{validate_vlan_id, SwitchError, SwitchResult};
use crate::session::SwitchSession;

/// Settle schedule for VLAN creation: how often to probe for the new
/// row and how long to keep probing before giving up.
#[derive(Debug, Clone, Copy)]
pub struct SettleOptions {
    /// Delay between existence probes.
    pub interval: Duration,
    /// Total probing budget.
    pub max_wait: Duration,
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            max_wait: Duration::from_secs(3),
        }
    }
}

/// Lifecycle operations for the VLANs of one switch session.
///
/// Obtained via [`SwitchSession::lifecycle`]; borrows the session for
/// its lifetime.
pub struct VlanLifecycle<'a, T: SnmpTransport> {
    session: &'a SwitchSession<T>,
    settle: SettleOptions,
}

impl<'a, T: SnmpTransport> VlanLifecycle<'a, T> {
    pub(crate) fn new(session: &'a SwitchSession<T>) -> Self {
        Self {
            session,
            settle: SettleOptions::default(),
        }
    }

    /// Overrides the creation settle schedule.
    pub fn with_settle(mut self, settle: SettleOptions) -> Self {
        self.settle = settle;
        self
    }

    /// Creates a VLAN: rowStatus=createAndGo, wait for the row to
    /// appear, then set its name.
    ///
    /// If the name SET fails after the row appeared, the row is NOT
    /// destroyed: the VLAN is left present but nameless, and the error
    /// reports the name step. Rolling back would risk deleting a VLAN
    /// another caller already started using.
    #[instrument(skip(self))]
    pub async fn create(&self, vlan_id: u16, name: &str) -> SwitchResult<()> {
        validate_vlan_id(vlan_id)?;

        let membership = self.session.membership();
        if membership.vlan_exists(vlan_id).await? {
            return Err(SwitchError::VlanExists { vlan_id });
        }
        debug!(vlan_id, "row absent, creating");

        let context = format!("create vlan {}", vlan_id);
        self.set_row_status(vlan_id, oid::ROW_STATUS_CREATE_AND_GO, &context)
            .await?;

        // Bounded settle: the row appears some time after createAndGo.
        let started = Instant::now();
        loop {
            if membership.vlan_exists(vlan_id).await? {
                break;
            }
            if started.elapsed() >= self.settle.max_wait {
                return Err(SwitchError::CreateTimedOut {
                    vlan_id,
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            sleep(self.settle.interval).await;
        }

        self.session
            .transport()
            .set(
                self.session.ip(),
                self.session.read_write_community(),
                &oid::vlan_name(vlan_id),
                SetValue::OctetString(name.to_string()),
            )
            .await
            .map_err(|e| {
                SwitchError::transport_partial(format!("create vlan {} (set name)", vlan_id), &e)
            })?;

        info!(vlan_id, name, "VLAN created");
        Ok(())
    }

    /// Deletes a VLAN: refused while any port is still a member, so a
    /// delete can never orphan port configuration.
    #[instrument(skip(self))]
    pub async fn delete(&self, vlan_id: u16) -> SwitchResult<()> {
        validate_vlan_id(vlan_id)?;

        let membership = self.session.membership();
        let (tagged, untagged) = membership.require_membership(vlan_id).await?;
        debug!(vlan_id, tagged = %tagged, untagged = %untagged, "membership snapshot before delete");

        if !tagged.is_zero() || !untagged.is_zero() {
            return Err(SwitchError::VlanNotEmpty { vlan_id });
        }

        let context = format!("delete vlan {}", vlan_id);
        self.set_row_status(vlan_id, oid::ROW_STATUS_DESTROY, &context)
            .await?;

        info!(vlan_id, "VLAN deleted");
        Ok(())
    }

    async fn set_row_status(&self, vlan_id: u16, status: i32, context: &str) -> SwitchResult<()> {
        self.session
            .transport()
            .set(
                self.session.ip(),
                self.session.read_write_community(),
                &oid::vlan_row_status(vlan_id),
                SetValue::Integer(status),
            )
            .await
            .map_err(|e| SwitchError::transport(context, &e))
    }
}
