use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("portal");

fn storage(e: impl Display) -> KVError {
    KVError::Storage(e.to_string())
}

/// RedbStore is a KVStore backed by redb, a pure-Rust embedded database.
/// It is the durable counterpart of browser local storage: one table, one
/// write transaction per mutation.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage)?;
            }
        }
        let db = Database::create(path).map_err(storage)?;

        // Create the table up front so readers never see TableDoesNotExist.
        let txn = db.begin_write().map_err(storage)?;
        txn.open_table(TABLE).map_err(storage)?;
        txn.commit().map_err(storage)?;

        debug!("RedbStore: opened {:?}", path);
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_read().map_err(storage)?;
        let table = txn.open_table(TABLE).map_err(storage)?;
        let value = table.get(key).map_err(storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        txn.commit().map_err(storage)?;
        debug!(key, bytes = value.len(), "RedbStore: set");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        txn.commit().map_err(storage)?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let txn = self.db.begin_read().map_err(storage)?;
        let table = txn.open_table(TABLE).map_err(storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(storage)? {
            let (key, value) = entry.map_err(storage)?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, value.value().to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.set("studentRequests", b"[]").unwrap();
            store.set("security_logs", b"[1]").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("studentRequests").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(store.get("security_logs").unwrap(), Some(b"[1]".to_vec()));
        assert!(store.get("registered_users").unwrap().is_none());
    }

    #[test]
    fn test_delete_and_scan() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("nested/portal.redb")).unwrap();

        store.set("user_email", b"a@b.edu").unwrap();
        store.set("user_role", b"student").unwrap();
        store.set("studentData", b"{}").unwrap();

        let keys: Vec<String> = store
            .scan("user_")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["user_email".to_string(), "user_role".to_string()]);

        store.delete("user_email").unwrap();
        store.delete("never_set").unwrap();
        assert_eq!(store.scan("user_").unwrap().len(), 1);
    }
}
