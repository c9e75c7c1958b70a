//! Typed stores over the raw key-value blobs.
//!
//! Callers never touch serialized JSON directly; everything goes through
//! [`AccountStore`], [`RequestStore`], [`SessionStore`] and [`SecurityLog`].

pub mod account;
pub mod request;
pub mod security_log;
pub mod session;

pub use account::AccountStore;
pub use request::RequestStore;
pub use security_log::{PageLog, SecurityLog, MAX_LOG_ENTRIES};
pub use session::SessionStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use campus_core::ServiceError;
use campus_kv::KVStore;

/// Storage keys. They match the browser portal so stored data stays
/// interchangeable.
pub mod keys {
    pub const REGISTERED_USERS: &str = "registered_users";
    pub const STUDENT_PROFILE: &str = "studentData";
    pub const STUDENT_REQUESTS: &str = "studentRequests";
    pub const SECURITY_LOGS: &str = "security_logs";

    pub const USER_AUTHENTICATED: &str = "user_authenticated";
    pub const USER_EMAIL: &str = "user_email";
    pub const USER_ROLE: &str = "user_role";
    pub const LOGIN_TIME: &str = "login_time";
}

/// Read a JSON value. Missing keys and unparseable blobs both read as `None`;
/// only a failing store is an error.
pub(crate) fn load_json<T: DeserializeOwned>(
    kv: &dyn KVStore,
    key: &str,
) -> Result<Option<T>, ServiceError> {
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_slice(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable blob");
            Ok(None)
        }
    }
}

/// Suffix of the key an unreadable list blob is copied to before the list is
/// rewritten.
const UNREADABLE_SUFFIX: &str = ".unreadable";

enum ListBlob {
    Missing,
    Records(Vec<Value>),
    Unreadable(Vec<u8>),
}

fn read_list_blob(kv: &dyn KVStore, key: &str) -> Result<ListBlob, ServiceError> {
    let Some(raw) = kv.get(key)? else {
        return Ok(ListBlob::Missing);
    };
    match serde_json::from_slice::<Value>(&raw) {
        Ok(Value::Array(records)) => Ok(ListBlob::Records(records)),
        Ok(Value::Null) => Ok(ListBlob::Missing),
        Ok(_) => {
            warn!(key, "list blob is not an array");
            Ok(ListBlob::Unreadable(raw))
        }
        Err(e) => {
            warn!(key, error = %e, "list blob is not valid JSON");
            Ok(ListBlob::Unreadable(raw))
        }
    }
}

/// Read a JSON array of records, failing open to an empty list. Records that
/// do not fit `T` are skipped one by one; the rest are still returned.
pub(crate) fn load_list<T: DeserializeOwned>(
    kv: &dyn KVStore,
    key: &str,
) -> Result<Vec<T>, ServiceError> {
    let ListBlob::Records(records) = read_list_blob(kv, key)? else {
        return Ok(Vec::new());
    };
    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, index, error = %e, "skipping unreadable record");
                None
            }
        })
        .collect())
}

/// Raw records for a read-modify-write. Records this crate cannot type are
/// kept untouched so writing the list back never drops them. A blob that is
/// not an array is copied to `<key>.unreadable` and the list starts empty.
pub(crate) fn load_records(kv: &dyn KVStore, key: &str) -> Result<Vec<Value>, ServiceError> {
    match read_list_blob(kv, key)? {
        ListBlob::Missing => Ok(Vec::new()),
        ListBlob::Records(records) => Ok(records),
        ListBlob::Unreadable(raw) => {
            let aside = format!("{key}{UNREADABLE_SUFFIX}");
            kv.set(&aside, &raw)?;
            warn!(key, aside = %aside, "moved unreadable list aside");
            Ok(Vec::new())
        }
    }
}

pub(crate) fn to_record<T: Serialize>(value: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()))
}

/// `id` field of a raw record.
pub(crate) fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

pub(crate) fn save_json<T: Serialize + ?Sized>(
    kv: &dyn KVStore,
    key: &str,
    value: &T,
) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(value).map_err(|e| ServiceError::Internal(e.to_string()))?;
    kv.set(key, &data)?;
    Ok(())
}
