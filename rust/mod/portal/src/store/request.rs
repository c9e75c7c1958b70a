use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use campus_core::ServiceError;
use campus_kv::KVStore;

use super::{keys, load_list, load_records, record_id, save_json, to_record};
use crate::model::{Request, RequestStatus};

/// Submitted requests, newest first. The whole list is rewritten on every
/// mutation.
pub struct RequestStore {
    kv: Arc<dyn KVStore>,
}

impl RequestStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Insert at the head of the list.
    pub fn create(&self, request: &Request) -> Result<(), ServiceError> {
        let mut records = self.records()?;
        records.insert(0, to_record(request)?);
        self.save(&records)?;
        debug!(id = %request.id, kind = %request.kind, "request created");
        Ok(())
    }

    /// All requests, most recent first.
    pub fn list(&self) -> Result<Vec<Request>, ServiceError> {
        load_list(self.kv.as_ref(), keys::STUDENT_REQUESTS)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Request>, ServiceError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Replace the record with the same id in place. Returns false, and
    /// writes nothing, when no such record exists.
    pub fn update(&self, request: &Request) -> Result<bool, ServiceError> {
        let mut records = self.records()?;
        let Some(slot) = records
            .iter_mut()
            .find(|r| record_id(r) == Some(request.id.as_str()))
        else {
            return Ok(false);
        };
        *slot = to_record(request)?;
        self.save(&records)?;
        Ok(true)
    }

    /// Mark approved and clear any earlier rejection reason.
    pub fn approve(&self, id: &str) -> Result<Option<Request>, ServiceError> {
        self.set_status(id, RequestStatus::Approved, "")
    }

    /// Mark rejected with the given reason, stored verbatim (may be empty).
    pub fn reject(&self, id: &str, reason: &str) -> Result<Option<Request>, ServiceError> {
        self.set_status(id, RequestStatus::Rejected, reason)
    }

    fn set_status(
        &self,
        id: &str,
        status: RequestStatus,
        reason: &str,
    ) -> Result<Option<Request>, ServiceError> {
        let Some(mut request) = self.find_by_id(id)? else {
            return Ok(None);
        };
        request.status = status;
        request.reason = reason.to_string();
        self.update(&request)?;
        debug!(id, status = %status, "request status changed");
        Ok(Some(request))
    }

    fn records(&self) -> Result<Vec<Value>, ServiceError> {
        load_records(self.kv.as_ref(), keys::STUDENT_REQUESTS)
    }

    fn save(&self, records: &[Value]) -> Result<(), ServiceError> {
        save_json(self.kv.as_ref(), keys::STUDENT_REQUESTS, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequestKind;
    use campus_kv::MemoryStore;

    fn store() -> RequestStore {
        RequestStore::new(Arc::new(MemoryStore::new()))
    }

    fn request(id: &str, purpose: &str) -> Request {
        Request {
            id: id.into(),
            kind: RequestKind::Complaint,
            purpose: purpose.into(),
            description: "details".into(),
            status: RequestStatus::Pending,
            reason: String::new(),
            date: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_create_puts_newest_first() {
        let store = store();
        store.create(&request("REQ000001", "hostel")).unwrap();
        store.create(&request("REQ000002", "library_fine")).unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["REQ000002", "REQ000001"]);
    }

    #[test]
    fn test_find_by_id() {
        let store = store();
        store.create(&request("REQ000001", "hostel")).unwrap();
        assert_eq!(
            store.find_by_id("REQ000001").unwrap().unwrap().purpose,
            "hostel"
        );
        assert!(store.find_by_id("REQ999999").unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let store = store();
        store.create(&request("REQ000001", "hostel")).unwrap();
        let before = store.list().unwrap();

        let updated = store.update(&request("REQ424242", "other")).unwrap();
        assert!(!updated);
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let store = store();
        store.create(&request("REQ000001", "hostel")).unwrap();
        store.create(&request("REQ000002", "library_fine")).unwrap();

        let mut changed = request("REQ000001", "hostel");
        changed.description = "edited".into();
        assert!(store.update(&changed).unwrap());

        let list = store.list().unwrap();
        assert_eq!(list[1].description, "edited");
        assert_eq!(list[0].id, "REQ000002");
    }

    #[test]
    fn test_reject_then_approve_overwrites() {
        let store = store();
        store.create(&request("REQ000001", "hostel")).unwrap();

        let rejected = store.reject("REQ000001", "Missing documents").unwrap().unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(rejected.reason, "Missing documents");

        let approved = store.approve("REQ000001").unwrap().unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert!(approved.reason.is_empty());
        assert_eq!(store.find_by_id("REQ000001").unwrap(), Some(approved));
    }

    #[test]
    fn test_mixed_stored_list_survives_create() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            keys::STUDENT_REQUESTS,
            br#"[{"id":"REQ000001","type":"complaint","purpose":"hostel",
                "description":"d","status":null,"date":"t"},
              {"id":"REQ000002","type":"transcript","purpose":"visa",
                "description":"d","status":"Pending","date":"t"}]"#,
        )
        .unwrap();
        let store = RequestStore::new(kv.clone());

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].status, RequestStatus::Pending);

        store.create(&request("REQ000003", "library_fine")).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["REQ000003", "REQ000001"]);

        let raw = load_records(kv.as_ref(), keys::STUDENT_REQUESTS).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[2]["type"], "transcript");

        assert!(store.approve("REQ000001").unwrap().is_some());
        assert_eq!(
            load_records(kv.as_ref(), keys::STUDENT_REQUESTS).unwrap()[1]["status"],
            "Approved"
        );
    }

    #[test]
    fn test_status_change_on_missing_request() {
        let store = store();
        assert!(store.approve("REQ000001").unwrap().is_none());
        assert!(store.reject("REQ000001", "x").unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
    }
}
