//! Per-role signup pages (`signup/student`, `signup/faculty`, `signup/admin`).
//!
//! Stricter than the unified registration form: full first and last name,
//! formatted roll number or employee id, optional 10-digit phone. Checkboxes
//! are only looked at once every field passes.

use serde_json::json;

use campus_core::{now_rfc3339, ServiceError};

use super::{login_url, Alert, Outcome, FIX_ERRORS};
use crate::model::{event, NewUser, Role};
use crate::store::PageLog;
use crate::validate::{self, field, FieldErrors, PasswordPolicy};
use crate::Portal;

pub const TERMS_REQUIRED: &str = "You must agree to the Terms & Conditions";
pub const SECURITY_REQUIRED: &str = "You must acknowledge the security responsibilities";

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    /// Students only.
    pub roll_number: String,
    /// Faculty and admin only.
    pub employee_id: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub terms: bool,
    /// `None` when the page has no security acknowledgement.
    pub security: Option<bool>,
}

/// Page id of a role's signup page.
pub fn page(role: Role) -> String {
    format!("signup/{role}")
}

fn log(portal: &Portal, role: Role) -> PageLog<'_> {
    portal.security_log.page(&page(role)).with_role(Some(role.as_str()))
}

pub fn visit(portal: &Portal, role: Role) -> Result<(), ServiceError> {
    log(portal, role).append(
        event::SIGNUP_PAGE_VISITED,
        json!({ "role": role, "timestamp": now_rfc3339() }),
    )?;
    Ok(())
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Field checks only; checkboxes are handled by [`submit`].
pub fn validate(role: Role, form: &SignupForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(validate::validate_full_name_strict(&form.full_name));
    errors.check(validate::validate_email(field::EMAIL, &form.email));
    if role.is_staff() {
        errors.check(validate::validate_employee_id(&form.employee_id));
    } else {
        errors.check(validate::validate_roll_number(&form.roll_number));
    }
    if let Some(phone) = filled(&form.phone) {
        errors.check(validate::validate_phone(phone));
    }
    errors.check(validate::validate_password(&form.password, PasswordPolicy::Registration));
    errors.check(validate::validate_confirmation(&form.password, &form.confirm_password));
    errors
}

fn check_boxes(form: &SignupForm) -> Option<(FieldErrors, &'static str)> {
    let mut errors = FieldErrors::new();
    errors.check(validate::validate_checked(field::TERMS, form.terms, TERMS_REQUIRED));
    if !errors.is_empty() {
        return Some((errors, TERMS_REQUIRED));
    }
    if form.security == Some(false) {
        errors.check(validate::validate_checked(field::SECURITY, false, SECURITY_REQUIRED));
        return Some((errors, SECURITY_REQUIRED));
    }
    None
}

pub fn submit(portal: &Portal, role: Role, form: &SignupForm) -> Result<Outcome, ServiceError> {
    let errors = validate(role, form);
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors, FIX_ERRORS));
    }
    if let Some((errors, message)) = check_boxes(form) {
        return Ok(Outcome::invalid(errors, message));
    }

    portal.round_trip();

    let log = log(portal, role);
    log.append(
        event::SIGNUP_FORM_SUBMITTED,
        json!({
            "role": role,
            "email": form.email,
            "timestamp": now_rfc3339(),
        }),
    )?;

    let (roll_number, employee_id) = if role.is_staff() {
        (None, Some(form.employee_id.trim().to_string()))
    } else {
        (Some(form.roll_number.trim().to_string()), None)
    };
    let user = portal.accounts.register(NewUser {
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        role: Some(role),
        password: form.password.clone(),
        roll_number,
        employee_id,
        department: filled(&form.department).map(str::to_string),
        phone: filled(&form.phone).map(str::to_string),
    })?;

    log.append(
        event::USER_REGISTERED,
        json!({ "email": user.email, "role": user.role }),
    )?;

    Ok(Outcome::Done {
        alert: Alert::success("Account created successfully! Redirecting to login..."),
        redirect: Some(login_url(&user.email)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faculty_form() -> SignupForm {
        SignupForm {
            full_name: "Meera Iyer".into(),
            email: "meera@college.edu".into(),
            employee_id: "FAC1024".into(),
            department: Some("Physics".into()),
            phone: Some("9876543210".into()),
            password: "Abcdef1!2345".into(),
            confirm_password: "Abcdef1!2345".into(),
            terms: true,
            security: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_id() {
        assert_eq!(page(Role::Student), "signup/student");
        assert_eq!(page(Role::Admin), "signup/admin");
    }

    #[test]
    fn test_faculty_signup() {
        let portal = Portal::in_memory();
        visit(&portal, Role::Faculty).unwrap();
        let outcome = submit(&portal, Role::Faculty, &faculty_form()).unwrap();
        assert_eq!(outcome.redirect(), Some("login.html?email=meera%40college.edu"));

        let user = portal.accounts.find_by_email("meera@college.edu").unwrap().unwrap();
        assert_eq!(user.role, Role::Faculty);
        assert_eq!(user.employee_id.as_deref(), Some("FAC1024"));
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
        assert!(user.roll_number.is_none());

        let events: Vec<String> = portal
            .security_log
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            events,
            vec!["SIGNUP_PAGE_VISITED", "SIGNUP_FORM_SUBMITTED", "USER_REGISTERED"]
        );
    }

    #[test]
    fn test_student_needs_formatted_roll_number() {
        let form = SignupForm {
            roll_number: "cs24".into(),
            ..faculty_form()
        };
        let errors = validate(Role::Student, &form);
        assert_eq!(errors.fields(), vec!["rollNumber"]);
        assert!(validate(Role::Faculty, &form).is_empty());
    }

    #[test]
    fn test_optional_fields() {
        let form = SignupForm {
            department: None,
            phone: Some("  ".into()),
            ..faculty_form()
        };
        assert!(validate(Role::Admin, &form).is_empty());

        let form = SignupForm {
            phone: Some("12345".into()),
            ..faculty_form()
        };
        assert_eq!(validate(Role::Admin, &form).fields(), vec!["phone"]);
    }

    #[test]
    fn test_checkboxes_checked_after_fields() {
        let portal = Portal::in_memory();

        let form = SignupForm {
            terms: false,
            security: Some(false),
            ..faculty_form()
        };
        let outcome = submit(&portal, Role::Faculty, &form).unwrap();
        assert_eq!(outcome.alert().unwrap().message, TERMS_REQUIRED);

        let form = SignupForm {
            security: Some(false),
            ..faculty_form()
        };
        let outcome = submit(&portal, Role::Faculty, &form).unwrap();
        assert_eq!(outcome.alert().unwrap().message, SECURITY_REQUIRED);
        assert_eq!(outcome.errors().unwrap().fields(), vec!["security"]);

        let form = SignupForm {
            security: None,
            ..faculty_form()
        };
        assert!(submit(&portal, Role::Faculty, &form).unwrap().is_done());
    }

    #[test]
    fn test_field_errors_win_over_checkboxes() {
        let portal = Portal::in_memory();
        let form = SignupForm {
            full_name: "Meera".into(),
            terms: false,
            ..faculty_form()
        };
        let outcome = submit(&portal, Role::Faculty, &form).unwrap();
        assert_eq!(outcome.alert().unwrap().message, FIX_ERRORS);
        assert_eq!(outcome.errors().unwrap().fields(), vec!["fullName"]);
        assert!(portal.accounts.list().unwrap().is_empty());
    }
}
