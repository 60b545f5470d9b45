//! Scripted in-memory transport for test suites.
//!
//! Replies are scripted per OID ahead of time; every SET is recorded so
//! tests can assert exactly which objects were written and with what
//! payloads. The mock applies no state transitions on its own — a SET
//! does not change later GET replies unless the test scripts it — which
//! is what makes read-modify-write races reproducible.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{SetValue, SnmpError, SnmpOp, SnmpResult, SnmpTransport};

/// One recorded SET call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCall {
    /// Community string the SET was issued with.
    pub community: String,
    /// Target OID.
    pub oid: String,
    /// Typed payload.
    pub value: SetValue,
}

#[derive(Default)]
struct MockState {
    /// Per-OID reply queues. `Ok` is a textual reply, `Err` a transport
    /// failure message. The last entry repeats once the queue drains.
    gets: HashMap<String, VecDeque<Result<String, String>>>,
    walks: HashMap<String, Result<Vec<(String, String)>, String>>,
    set_errors: HashMap<String, String>,
    set_calls: Vec<SetCall>,
    get_log: Vec<String>,
}

/// Scripted [`SnmpTransport`] implementation.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Creates an empty mock; every request fails until scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful GET reply for an OID. Calling this several
    /// times for the same OID queues replies; the final one repeats.
    pub fn on_get(&self, oid: impl Into<String>, reply: impl Into<String>) {
        self.lock()
            .gets
            .entry(oid.into())
            .or_default()
            .push_back(Ok(reply.into()));
    }

    /// Scripts a failing GET for an OID (queued like [`Self::on_get`]).
    pub fn on_get_error(&self, oid: impl Into<String>, message: impl Into<String>) {
        self.lock()
            .gets
            .entry(oid.into())
            .or_default()
            .push_back(Err(message.into()));
    }

    /// Scripts a WALK reply for a subtree prefix.
    pub fn on_walk(&self, prefix: impl Into<String>, pairs: Vec<(String, String)>) {
        self.lock().walks.insert(prefix.into(), Ok(pairs));
    }

    /// Scripts a failing WALK for a subtree prefix.
    pub fn on_walk_error(&self, prefix: impl Into<String>, message: impl Into<String>) {
        self.lock().walks.insert(prefix.into(), Err(message.into()));
    }

    /// Makes every SET against an OID fail.
    pub fn fail_set(&self, oid: impl Into<String>, message: impl Into<String>) {
        self.lock().set_errors.insert(oid.into(), message.into());
    }

    /// Returns all SETs issued so far, in order. Failed SETs are
    /// recorded too: the write was attempted.
    pub fn set_calls(&self) -> Vec<SetCall> {
        self.lock().set_calls.clone()
    }

    /// Returns the OIDs of all GETs issued so far, in order.
    pub fn get_log(&self) -> Vec<String> {
        self.lock().get_log.clone()
    }

    /// Returns true if no GET, SET or WALK was ever issued.
    pub fn untouched(&self) -> bool {
        let state = self.lock();
        state.get_log.is_empty() && state.set_calls.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock transport lock poisoned")
    }
}

#[async_trait]
impl SnmpTransport for MockTransport {
    async fn get(&self, ip: IpAddr, _community: &str, oid: &str) -> SnmpResult<String> {
        let mut state = self.lock();
        state.get_log.push(oid.to_string());

        let queue = state
            .gets
            .get_mut(oid)
            .ok_or_else(|| SnmpError::new(SnmpOp::Get, ip.to_string(), oid, "not scripted"))?;
        let reply = if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue.front().cloned().expect("non-empty queue")
        };
        reply.map_err(|message| SnmpError::new(SnmpOp::Get, ip.to_string(), oid, message))
    }

    async fn set(
        &self,
        ip: IpAddr,
        community: &str,
        oid: &str,
        value: SetValue,
    ) -> SnmpResult<()> {
        let mut state = self.lock();
        state.set_calls.push(SetCall {
            community: community.to_string(),
            oid: oid.to_string(),
            value,
        });
        match state.set_errors.get(oid) {
            Some(message) => Err(SnmpError::new(SnmpOp::Set, ip.to_string(), oid, message)),
            None => Ok(()),
        }
    }

    async fn walk(
        &self,
        ip: IpAddr,
        _community: &str,
        oid_prefix: &str,
    ) -> SnmpResult<Vec<(String, String)>> {
        match self.lock().walks.get(oid_prefix) {
            Some(Ok(pairs)) => Ok(pairs.clone()),
            Some(Err(message)) => Err(SnmpError::new(
                SnmpOp::Walk,
                ip.to_string(),
                oid_prefix,
                message,
            )),
            None => Err(SnmpError::new(
                SnmpOp::Walk,
                ip.to_string(),
                oid_prefix,
                "not scripted",
            )),
        }
    }
}
