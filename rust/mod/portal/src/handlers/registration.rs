//! Unified registration page: one form, role chosen with tabs.

use serde_json::json;

use campus_core::{now_rfc3339, ServiceError};

use super::{login_url, Alert, Outcome, FIX_ERRORS};
use crate::model::{event, NewUser, Role};
use crate::validate::{self, field, FieldErrors, PasswordPolicy, ValidationError};
use crate::Portal;

pub const PAGE: &str = "registration";

/// Fields reported in `REGISTRATION_VALIDATION_FAILED`. Role, identifier and
/// terms failures are shown on the form but not logged.
const LOGGED_FIELDS: [&str; 4] = [
    field::FULL_NAME,
    field::COLLEGE_EMAIL,
    field::PASSWORD,
    field::CONFIRM_PASSWORD,
];

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Selected role tab; `None` until the user picks one.
    pub role: Option<Role>,
    pub full_name: String,
    pub college_email: String,
    pub password: String,
    pub confirm_password: String,
    pub roll_number: String,
    pub employee_id: String,
    pub department: String,
    pub terms: bool,
}

/// Which role-specific field groups are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleFields {
    pub roll_number: bool,
    pub employee_id: bool,
    pub department: bool,
}

impl RoleFields {
    pub fn for_role(role: Role) -> Self {
        Self {
            roll_number: !role.is_staff(),
            employee_id: role.is_staff(),
            department: role.is_staff(),
        }
    }
}

pub fn visit(portal: &Portal) -> Result<(), ServiceError> {
    portal.security_log.page(PAGE).append(
        event::REGISTRATION_PAGE_LOADED,
        json!({ "timestamp": now_rfc3339() }),
    )?;
    Ok(())
}

/// Switch role tabs.
pub fn select_role(portal: &Portal, role: Role) -> Result<RoleFields, ServiceError> {
    portal
        .security_log
        .page(PAGE)
        .with_role(Some(role.as_str()))
        .append(event::ROLE_SELECTED, json!({ "role": role }))?;
    Ok(RoleFields::for_role(role))
}

/// Identifier fields only need to be present here; the per-role signup
/// pages apply the stricter formats.
fn validate_present(field: &'static str, value: &str, message: &str) -> validate::FieldResult {
    if value.trim().chars().count() < 3 {
        Err(ValidationError::new(field, message))
    } else {
        Ok(())
    }
}

pub fn validate(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(validate::validate_full_name(&form.full_name));
    errors.check(
        validate::validate_email(field::COLLEGE_EMAIL, &form.college_email).map_err(|e| {
            ValidationError::new(e.field, "Please enter a valid college email address")
        }),
    );
    errors.check(validate::validate_password(&form.password, PasswordPolicy::Registration));
    errors.check(validate::validate_confirmation(&form.password, &form.confirm_password));

    match form.role {
        None => errors.check(Err(ValidationError::new(field::ROLE, "Please select a role"))),
        Some(role) if role.is_staff() => {
            errors.check(validate_present(
                field::EMPLOYEE_ID,
                &form.employee_id,
                "Employee ID is required",
            ));
            if form.department.trim().is_empty() {
                errors.check(Err(ValidationError::new(
                    field::DEPARTMENT,
                    "Department is required",
                )));
            }
        }
        Some(_) => errors.check(validate_present(
            field::ROLL_NUMBER,
            &form.roll_number,
            "Roll number is required",
        )),
    }

    errors.check(validate::validate_checked(
        field::TERMS,
        form.terms,
        "You must agree to the Terms & Conditions",
    ));
    errors
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn submit(portal: &Portal, form: &RegistrationForm) -> Result<Outcome, ServiceError> {
    let role_tag = form.role.map(|r| r.as_str());
    let log = portal.security_log.page(PAGE).with_role(role_tag);

    let errors = validate(form);
    if !errors.is_empty() {
        let failed: Vec<&str> = errors
            .fields()
            .into_iter()
            .filter(|f| LOGGED_FIELDS.contains(f))
            .collect();
        log.append(
            event::REGISTRATION_VALIDATION_FAILED,
            json!({ "failedFields": failed }),
        )?;
        return Ok(Outcome::invalid(errors, FIX_ERRORS));
    }

    portal.round_trip();

    let staff = form.role.is_some_and(|r| r.is_staff());
    let user = portal.accounts.register(NewUser {
        full_name: form.full_name.clone(),
        email: form.college_email.clone(),
        role: form.role,
        password: form.password.clone(),
        roll_number: if staff { None } else { non_empty(&form.roll_number) },
        employee_id: if staff { non_empty(&form.employee_id) } else { None },
        department: if staff { non_empty(&form.department) } else { None },
        phone: None,
    })?;

    log.append(
        event::REGISTRATION_SUCCESSFUL,
        json!({
            "userId": user.id,
            "email": user.email,
            "role": user.role,
        }),
    )?;

    Ok(Outcome::Done {
        alert: Alert::success("Account created successfully! Redirecting to login..."),
        redirect: Some(login_url(&user.email)),
    })
}
