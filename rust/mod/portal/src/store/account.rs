use std::sync::Arc;

use tracing::debug;

use campus_core::{new_id, now_rfc3339, ServiceError};
use campus_kv::KVStore;

use super::{keys, load_json, load_list, load_records, save_json, to_record};
use crate::model::{NewUser, Role, StudentProfile, User};

/// Registered accounts plus the profile snapshot of whoever logged in last.
///
/// Email is not unique: registering twice appends a second record, and the
/// first match wins at lookup.
pub struct AccountStore {
    kv: Arc<dyn KVStore>,
}

impl AccountStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Append a new account. Assigns the id and creation time; the account
    /// starts unverified. A form without a selected role registers a student.
    pub fn register(&self, input: NewUser) -> Result<User, ServiceError> {
        let user = User {
            id: format!("user_{}", &new_id()[..12]),
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_string(),
            role: input.role.unwrap_or(Role::Student),
            password: Some(input.password),
            roll_number: input.roll_number,
            employee_id: input.employee_id,
            department: input.department,
            phone: input.phone,
            created_at: now_rfc3339(),
            verified: false,
        };

        let mut records = load_records(self.kv.as_ref(), keys::REGISTERED_USERS)?;
        records.push(to_record(&user)?);
        save_json(self.kv.as_ref(), keys::REGISTERED_USERS, &records)?;

        debug!(id = %user.id, role = %user.role, "registered account");
        Ok(user)
    }

    /// All accounts in registration order.
    pub fn list(&self) -> Result<Vec<User>, ServiceError> {
        load_list(self.kv.as_ref(), keys::REGISTERED_USERS)
    }

    /// First account registered with this exact email.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.list()?.into_iter().find(|u| u.email == email))
    }

    /// Look up by email and compare the stored password verbatim. An account
    /// stored without a password never matches.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .find_by_email(email)?
            .filter(|u| u.password.as_deref() == Some(password)))
    }

    // ── Profile snapshot ──

    pub fn save_profile(&self, profile: &StudentProfile) -> Result<(), ServiceError> {
        save_json(self.kv.as_ref(), keys::STUDENT_PROFILE, profile)
    }

    pub fn profile(&self) -> Result<Option<StudentProfile>, ServiceError> {
        load_json(self.kv.as_ref(), keys::STUDENT_PROFILE)
    }

    pub fn clear_profile(&self) -> Result<(), ServiceError> {
        self.kv.delete(keys::STUDENT_PROFILE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_kv::MemoryStore;

    fn store() -> AccountStore {
        AccountStore::new(Arc::new(MemoryStore::new()))
    }

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            full_name: "Asha Rao".into(),
            email: email.into(),
            role: Some(Role::Student),
            password: password.into(),
            roll_number: Some("CS2024001".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_assigns_id_and_timestamp() {
        let store = store();
        let user = store.register(new_user("a@b.edu", "Abcdef1!2345")).unwrap();
        assert!(user.id.starts_with("user_"));
        assert!(!user.verified);
        assert!(user.created_at.contains('T'));
        assert_eq!(store.list().unwrap(), vec![user]);
    }

    #[test]
    fn test_duplicates_allowed_first_match_wins() {
        let store = store();
        let first = store.register(new_user("a@b.edu", "first")).unwrap();
        store.register(new_user("a@b.edu", "second")).unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
        assert_eq!(store.find_by_email("a@b.edu").unwrap().unwrap().id, first.id);
        assert!(store.authenticate("a@b.edu", "first").unwrap().is_some());
        assert!(store.authenticate("a@b.edu", "second").unwrap().is_none());
    }

    #[test]
    fn test_authenticate() {
        let store = store();
        let user = store.register(new_user("a@b.edu", "Abcdef1!2345")).unwrap();

        assert_eq!(store.authenticate("a@b.edu", "Abcdef1!2345").unwrap(), Some(user));
        assert!(store.authenticate("a@b.edu", "wrong").unwrap().is_none());
        assert!(store.authenticate("A@B.EDU", "Abcdef1!2345").unwrap().is_none());
        assert!(store.authenticate("x@y.edu", "Abcdef1!2345").unwrap().is_none());
    }

    #[test]
    fn test_empty_password_matches_exactly() {
        let store = store();
        store.register(new_user("a@b.edu", "")).unwrap();
        assert!(store.authenticate("a@b.edu", "").unwrap().is_some());
        assert!(store.authenticate("a@b.edu", "x").unwrap().is_none());
    }

    #[test]
    fn test_account_without_password_cannot_log_in() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            keys::REGISTERED_USERS,
            br#"[{"id":"user_1","fullName":"Asha Rao","email":"a@b.edu",
                "role":"student","createdAt":"t"}]"#,
        )
        .unwrap();
        let store = AccountStore::new(kv);

        assert!(store.find_by_email("a@b.edu").unwrap().is_some());
        assert!(store.authenticate("a@b.edu", "").unwrap().is_none());
    }

    #[test]
    fn test_register_keeps_unreadable_records() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            keys::REGISTERED_USERS,
            br#"[{"id":"user_1","fullName":"Asha Rao","email":"a@b.edu",
                "role":"student","password":"p","createdAt":"t"},
              {"id":"user_2","fullName":"Old Guard","email":"old@b.edu",
                "role":"unknown","createdAt":"t"}]"#,
        )
        .unwrap();
        let store = AccountStore::new(kv.clone());

        let listed: Vec<String> = store.list().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(listed, vec!["user_1"]);

        let added = store.register(new_user("new@b.edu", "Abcdef1!2345")).unwrap();
        let listed: Vec<String> = store.list().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(listed, vec!["user_1".to_string(), added.id]);

        let raw = load_records(kv.as_ref(), keys::REGISTERED_USERS).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[1]["role"], "unknown");
    }

    #[test]
    fn test_profile_snapshot() {
        let store = store();
        assert!(store.profile().unwrap().is_none());

        let profile = StudentProfile {
            name: "Asha Rao".into(),
            roll: "CS2024001".into(),
            email: "a@b.edu".into(),
            role: Some(Role::Student),
        };
        store.save_profile(&profile).unwrap();
        assert_eq!(store.profile().unwrap(), Some(profile));

        store.clear_profile().unwrap();
        assert!(store.profile().unwrap().is_none());
    }
}
