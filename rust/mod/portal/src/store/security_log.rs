use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use campus_core::{now_rfc3339, ServiceError};
use campus_kv::KVStore;

use super::{keys, load_list, load_records, save_json, to_record};
use crate::model::SecurityLogEntry;

/// The log never holds more than this many entries.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Append-only, capped audit trail of user actions.
///
/// Entries are stored oldest first. Appending past the cap drops the oldest
/// entries.
pub struct SecurityLog {
    kv: Arc<dyn KVStore>,
    user_agent: String,
}

impl SecurityLog {
    pub fn new(kv: Arc<dyn KVStore>, user_agent: impl Into<String>) -> Self {
        Self {
            kv,
            user_agent: user_agent.into(),
        }
    }

    /// A logger bound to one page.
    pub fn page<'a>(&'a self, page: &str) -> PageLog<'a> {
        PageLog {
            log: self,
            page: page.to_string(),
            role: None,
        }
    }

    /// Append one entry and trim to the cap.
    pub fn append(
        &self,
        page: &str,
        role: Option<&str>,
        event_type: &str,
        details: Value,
    ) -> Result<SecurityLogEntry, ServiceError> {
        let entry = SecurityLogEntry {
            timestamp: now_rfc3339(),
            event_type: event_type.to_string(),
            role: role.map(str::to_string),
            details,
            page: page.to_string(),
            user_agent: self.user_agent.clone(),
        };

        let mut records = load_records(self.kv.as_ref(), keys::SECURITY_LOGS)?;
        records.push(to_record(&entry)?);
        if records.len() > MAX_LOG_ENTRIES {
            let excess = records.len() - MAX_LOG_ENTRIES;
            records.drain(..excess);
        }
        save_json(self.kv.as_ref(), keys::SECURITY_LOGS, &records)?;

        info!(event = event_type, page, details = %entry.details, "security event");
        Ok(entry)
    }

    /// Every retained entry, oldest first.
    pub fn entries(&self) -> Result<Vec<SecurityLogEntry>, ServiceError> {
        load_list(self.kv.as_ref(), keys::SECURITY_LOGS)
    }
}

/// [`SecurityLog`] scoped to a page and, optionally, the role selected on it.
pub struct PageLog<'a> {
    log: &'a SecurityLog,
    page: String,
    role: Option<String>,
}

impl PageLog<'_> {
    pub fn with_role(mut self, role: Option<&str>) -> Self {
        self.role = role.map(str::to_string);
        self
    }

    pub fn append(&self, event_type: &str, details: Value) -> Result<SecurityLogEntry, ServiceError> {
        self.log
            .append(&self.page, self.role.as_deref(), event_type, details)
    }
}
