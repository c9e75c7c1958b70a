//! Login page.

use serde_json::json;
use url::form_urlencoded;

use campus_core::{now_rfc3339, ServiceError};

use super::{location, Alert, Outcome, FIX_ERRORS};
use crate::model::{event, StudentProfile};
use crate::validate::{self, FieldErrors, PasswordPolicy};
use crate::Portal;

pub const PAGE: &str = "login";

/// Shown for every authentication failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email address or institutional id.
    pub email: String,
    pub password: String,
}

/// Record a page visit.
pub fn visit(portal: &Portal) -> Result<(), ServiceError> {
    portal
        .security_log
        .page(PAGE)
        .append(event::LOGIN_PAGE_VISITED, json!({ "timestamp": now_rfc3339() }))?;
    Ok(())
}

/// Email carried over from registration in the `email` query parameter.
pub fn prefill_email(query: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == "email")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

pub fn validate(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(validate::validate_login_identifier(&form.email));
    errors.check(validate::validate_password(&form.password, PasswordPolicy::Login));
    errors
}

/// Check credentials and open a session.
pub fn submit(portal: &Portal, form: &LoginForm) -> Result<Outcome, ServiceError> {
    let errors = validate(form);
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors, FIX_ERRORS));
    }

    portal.round_trip();

    let log = portal.security_log.page(PAGE);
    let Some(user) = portal.accounts.authenticate(&form.email, &form.password)? else {
        log.append(
            event::LOGIN_FAILED,
            json!({
                "email": form.email,
                "timestamp": now_rfc3339(),
                "reason": "Invalid credentials",
            }),
        )?;
        return Ok(Outcome::refused(INVALID_CREDENTIALS));
    };

    log.append(
        event::LOGIN_SUCCESS,
        json!({
            "email": form.email,
            "role": user.role,
            "timestamp": now_rfc3339(),
        }),
    )?;

    portal.session.start(&user)?;

    let name = if user.full_name.is_empty() {
        "Student".to_string()
    } else {
        user.full_name.clone()
    };
    portal.accounts.save_profile(&StudentProfile {
        name,
        roll: user.roll_number.clone().unwrap_or_else(|| "N/A".to_string()),
        email: form.email.clone(),
        role: Some(user.role),
    })?;

    Ok(Outcome::Done {
        alert: Alert::success("Login successful! Redirecting..."),
        redirect: Some(location::DASHBOARD.to_string()),
    })
}
