//! End-to-end flows through the page controllers.

use std::sync::Arc;

use campus_core::PortalConfig;
use campus_kv::{KVStore, RedbStore};
use portal::handlers::dashboard::Dashboard;
use portal::handlers::login::{self, LoginForm};
use portal::handlers::registration::{self, RegistrationForm};
use portal::model::{NewUser, RequestKind, RequestStatus, Role};
use portal::render;
use portal::store::MAX_LOG_ENTRIES;
use portal::validate::{is_strong_password, password_strength, PasswordStrength};
use portal::Portal;
use serde_json::json;

#[test]
fn test_register_then_authenticate() {
    let portal = Portal::in_memory();
    let user = portal
        .accounts
        .register(NewUser {
            full_name: "Asha Rao".into(),
            email: "a@b.edu".into(),
            password: "Abcdef1!2345".into(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(user.role, Role::Student);
    assert_eq!(
        portal.accounts.authenticate("a@b.edu", "Abcdef1!2345").unwrap(),
        Some(user)
    );
    assert!(portal.accounts.authenticate("a@b.edu", "wrong").unwrap().is_none());
}

#[test]
fn test_failed_login_is_logged() {
    let portal = Portal::in_memory();
    portal
        .accounts
        .register(NewUser {
            email: "a@b.edu".into(),
            password: "Abcdef1!2345".into(),
            ..Default::default()
        })
        .unwrap();

    let outcome = login::submit(
        &portal,
        &LoginForm {
            email: "a@b.edu".into(),
            password: "wrong".into(),
        },
    )
    .unwrap();
    assert!(!outcome.is_done());

    let entries = portal.security_log.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event_type, "LOGIN_FAILED");
    assert_eq!(entries[0].details["email"], "a@b.edu");
}

#[test]
fn test_registration_login_dashboard_logout() {
    let portal = Portal::in_memory();

    registration::visit(&portal).unwrap();
    registration::select_role(&portal, Role::Student).unwrap();
    let outcome = registration::submit(
        &portal,
        &RegistrationForm {
            role: Some(Role::Student),
            full_name: "Asha Rao".into(),
            college_email: "a@b.edu".into(),
            password: "Abcdef1!2345".into(),
            confirm_password: "Abcdef1!2345".into(),
            roll_number: "CS2024001".into(),
            terms: true,
            ..Default::default()
        },
    )
    .unwrap();
    let redirect = outcome.redirect().unwrap().to_string();
    let query = redirect.split_once('?').map(|(_, q)| q).unwrap();
    let email = login::prefill_email(query).unwrap();
    assert_eq!(email, "a@b.edu");

    let outcome = login::submit(
        &portal,
        &LoginForm {
            email,
            password: "Abcdef1!2345".into(),
        },
    )
    .unwrap();
    assert_eq!(outcome.redirect(), Some("student-dashboard.html"));

    let dashboard = Dashboard::new(&portal, false);
    assert_eq!(dashboard.profile().unwrap().roll, "CS2024001");
    dashboard.logout().unwrap();
    assert!(portal.session.current().unwrap().is_none());

    let events: Vec<String> = portal
        .security_log
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        events,
        vec![
            "REGISTRATION_PAGE_LOADED",
            "ROLE_SELECTED",
            "REGISTRATION_SUCCESSFUL",
            "LOGIN_SUCCESS",
            "LOGOUT",
        ]
    );
}

#[test]
fn test_complaint_is_pending_and_rendered() {
    let portal = Portal::in_memory();
    let dashboard = Dashboard::new(&portal, false);
    dashboard
        .submit(RequestKind::Complaint, "library_fine", "Fine charged twice")
        .unwrap();

    let requests = portal.requests.list().unwrap();
    assert_eq!(requests.len(), 1);
    let stored = &requests[0];
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.kind, RequestKind::Complaint);
    assert_eq!(stored.purpose, "library_fine");
    assert_eq!(render::format_purpose(&stored.purpose), "Library Fine");

    let blob = serde_json::to_value(stored).unwrap();
    assert_eq!(blob["status"], "Pending");
    assert_eq!(blob["type"], "complaint");
}

#[test]
fn test_reject_then_approve_overwrites() {
    let portal = Portal::in_memory();
    let dashboard = Dashboard::new(&portal, true);
    dashboard
        .submit(RequestKind::Bonafide, "bank_loan", "For education loan")
        .unwrap();
    let id = portal.requests.list().unwrap()[0].id.clone();

    assert!(dashboard.reject(&id, Some("Missing documents")).unwrap().is_done());
    let stored = portal.requests.find_by_id(&id).unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Rejected);
    assert_eq!(stored.reason, "Missing documents");

    assert!(dashboard.approve(&id).unwrap().is_done());
    let stored = portal.requests.find_by_id(&id).unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
    assert!(stored.reason.is_empty());
    assert!(dashboard.render().unwrap().contains("Download Document"));
}

#[test]
fn test_security_log_is_capped() {
    let portal = Portal::in_memory();
    let log = portal.security_log.page("test");
    for i in 0..=MAX_LOG_ENTRIES {
        log.append("TICK", json!({ "n": i })).unwrap();
    }

    let entries = portal.security_log.entries().unwrap();
    assert_eq!(entries.len(), MAX_LOG_ENTRIES);
    assert_eq!(entries[0].details["n"], 1);
    assert_eq!(entries[MAX_LOG_ENTRIES - 1].details["n"], MAX_LOG_ENTRIES);
}

#[test]
fn test_password_rules() {
    for pw in ["Abcdef1!234", "abcdef1!2345", "ABCDEF1!2345", "Abcdefgh!ijk", "Abcdef123456"] {
        assert!(!is_strong_password(pw), "{pw}");
    }
    assert!(is_strong_password("Abcdef1!2345"));
    assert_eq!(password_strength("Abcdef1!2345"), Some(PasswordStrength::Strong));
}

#[test]
fn test_redb_portal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portal.redb");
    let config = PortalConfig {
        latency_ms: 0,
        ..Default::default()
    };

    {
        let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&db_path).unwrap());
        let portal = Portal::from_config(kv, &config);
        portal
            .accounts
            .register(NewUser {
                full_name: "Asha Rao".into(),
                email: "a@b.edu".into(),
                password: "Abcdef1!2345".into(),
                ..Default::default()
            })
            .unwrap();
        let outcome = login::submit(
            &portal,
            &LoginForm {
                email: "a@b.edu".into(),
                password: "Abcdef1!2345".into(),
            },
        )
        .unwrap();
        assert!(outcome.is_done());
        Dashboard::new(&portal, false)
            .submit(RequestKind::Complaint, "hostel", "Water leak")
            .unwrap();
    }

    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&db_path).unwrap());
    let portal = Portal::from_config(kv, &config);
    assert!(portal
        .accounts
        .authenticate("a@b.edu", "Abcdef1!2345")
        .unwrap()
        .is_some());
    assert_eq!(portal.session.current().unwrap().unwrap().email, "a@b.edu");

    let requests = portal.requests.list().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].purpose, "hostel");
    assert_eq!(requests[0].status, RequestStatus::Pending);

    let events: Vec<String> = portal
        .security_log
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert!(events.contains(&"LOGIN_SUCCESS".to_string()));
}
