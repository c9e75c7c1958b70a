//! Campus portal: login, multi-role registration and the student request
//! dashboard.
//!
//! All state lives in key-value storage: a durable store for accounts,
//! requests and the security log, and a transient one for session flags.
//! Page controllers in [`handlers`] wire form input to [`validate`] and the
//! stores in [`store`].

pub mod handlers;
pub mod latency;
pub mod model;
pub mod render;
pub mod store;
pub mod validate;

use std::sync::Arc;

use campus_core::PortalConfig;
use campus_kv::{KVStore, MemoryStore};

use latency::{FixedLatency, Latency, NoLatency};
use store::{AccountStore, RequestStore, SecurityLog, SessionStore};

/// Everything a page controller needs, passed explicitly instead of living
/// in globals.
pub struct Portal {
    pub accounts: AccountStore,
    pub requests: RequestStore,
    pub session: SessionStore,
    pub security_log: SecurityLog,
    latency: Arc<dyn Latency>,
}

impl Portal {
    /// Wire the stores. `local` persists across sessions; `session` holds
    /// login flags and may be the same store.
    pub fn new(
        local: Arc<dyn KVStore>,
        session: Arc<dyn KVStore>,
        latency: Arc<dyn Latency>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            accounts: AccountStore::new(Arc::clone(&local)),
            requests: RequestStore::new(Arc::clone(&local)),
            session: SessionStore::new(session),
            security_log: SecurityLog::new(local, user_agent),
            latency,
        }
    }

    /// Build from configuration over an already-opened durable store. Session
    /// flags share the durable store so they survive between CLI runs.
    pub fn from_config(kv: Arc<dyn KVStore>, config: &PortalConfig) -> Self {
        Self::new(
            Arc::clone(&kv),
            kv,
            Arc::new(FixedLatency::from_millis(config.latency_ms)),
            config.user_agent.clone(),
        )
    }

    /// Fully in-memory portal with no simulated latency.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(NoLatency),
            format!("campus-portal/{}", env!("CARGO_PKG_VERSION")),
        )
    }

    /// Pause for the simulated round trip.
    pub(crate) fn round_trip(&self) {
        self.latency.wait();
    }
}
