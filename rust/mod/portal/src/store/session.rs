use std::sync::Arc;

use campus_core::{now_rfc3339, ServiceError};
use campus_kv::KVStore;

use super::keys;
use crate::model::{Role, SessionFlags, User};

const SESSION_KEYS: [&str; 4] = [
    keys::USER_AUTHENTICATED,
    keys::USER_EMAIL,
    keys::USER_ROLE,
    keys::LOGIN_TIME,
];

/// Login flags, one plain-text value per key like browser session storage.
pub struct SessionStore {
    kv: Arc<dyn KVStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Record a successful login.
    pub fn start(&self, user: &User) -> Result<SessionFlags, ServiceError> {
        let flags = SessionFlags {
            authenticated: true,
            email: user.email.clone(),
            role: Some(user.role),
            login_time: now_rfc3339(),
        };
        self.kv.set(keys::USER_AUTHENTICATED, b"true")?;
        self.kv.set(keys::USER_EMAIL, flags.email.as_bytes())?;
        self.kv.set(keys::USER_ROLE, user.role.as_str().as_bytes())?;
        self.kv.set(keys::LOGIN_TIME, flags.login_time.as_bytes())?;
        Ok(flags)
    }

    /// Current session, if someone is logged in.
    pub fn current(&self) -> Result<Option<SessionFlags>, ServiceError> {
        if self.text(keys::USER_AUTHENTICATED)?.as_deref() != Some("true") {
            return Ok(None);
        }
        Ok(Some(SessionFlags {
            authenticated: true,
            email: self.text(keys::USER_EMAIL)?.unwrap_or_default(),
            role: self.text(keys::USER_ROLE)?.as_deref().and_then(Role::parse),
            login_time: self.text(keys::LOGIN_TIME)?.unwrap_or_default(),
        }))
    }

    /// Forget the session.
    pub fn clear(&self) -> Result<(), ServiceError> {
        for key in SESSION_KEYS {
            self.kv.delete(key)?;
        }
        Ok(())
    }

    fn text(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self
            .kv
            .get(key)?
            .map(|raw| String::from_utf8_lossy(&raw).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_kv::MemoryStore;

    fn user() -> User {
        User {
            id: "user_1".into(),
            full_name: "Asha Rao".into(),
            email: "a@b.edu".into(),
            role: Role::Faculty,
            password: Some("x".into()),
            roll_number: None,
            employee_id: Some("EMP1".into()),
            department: None,
            phone: None,
            created_at: "t".into(),
            verified: false,
        }
    }

    #[test]
    fn test_start_current_clear() {
        let kv = Arc::new(MemoryStore::new());
        let session = SessionStore::new(kv.clone());
        assert!(session.current().unwrap().is_none());

        let started = session.start(&user()).unwrap();
        let current = session.current().unwrap().unwrap();
        assert_eq!(current, started);
        assert_eq!(current.role, Some(Role::Faculty));
        assert_eq!(current.email, "a@b.edu");

        session.clear().unwrap();
        assert!(session.current().unwrap().is_none());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_not_authenticated_without_flag() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::USER_EMAIL, b"a@b.edu").unwrap();
        kv.set(keys::USER_AUTHENTICATED, b"false").unwrap();
        let session = SessionStore::new(kv);
        assert!(session.current().unwrap().is_none());
    }
}
