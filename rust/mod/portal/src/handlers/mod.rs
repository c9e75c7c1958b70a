//! Page controllers.
//!
//! Each page module takes the [`Portal`](crate::Portal) plus the submitted
//! form and returns an [`Outcome`]: what to show the user and where to go
//! next. Field problems come back inside the outcome; `Err` is reserved for
//! storage failures.

pub mod dashboard;
pub mod login;
pub mod registration;
pub mod signup;

use url::form_urlencoded;

use crate::validate::FieldErrors;

/// Page locations used for redirects.
pub mod location {
    pub const LOGIN: &str = "login.html";
    pub const DASHBOARD: &str = "student-dashboard.html";
}

pub const FIX_ERRORS: &str = "Please fix the errors below";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Banner message at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of submitting a form or pressing an action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Field checks failed; nothing was written.
    Invalid { errors: FieldErrors, alert: Alert },
    /// Input was well-formed but the action was refused.
    Refused { alert: Alert },
    /// The user backed out; nothing changed.
    Cancelled,
    /// The action went through.
    Done {
        alert: Alert,
        redirect: Option<String>,
    },
}

impl Outcome {
    pub(crate) fn invalid(errors: FieldErrors, message: &str) -> Self {
        Self::Invalid {
            errors,
            alert: Alert::error(message),
        }
    }

    pub(crate) fn refused(message: impl Into<String>) -> Self {
        Self::Refused {
            alert: Alert::error(message),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Invalid { alert, .. } | Self::Refused { alert } | Self::Done { alert, .. } => {
                Some(alert)
            }
            Self::Cancelled => None,
        }
    }

    pub fn redirect(&self) -> Option<&str> {
        match self {
            Self::Done { redirect, .. } => redirect.as_deref(),
            _ => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Login page URL with the email pre-filled.
pub fn login_url(email: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(email.as_bytes()).collect();
    format!("{}?email={encoded}", location::LOGIN)
}

/// Show/hide state of a password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PasswordVisibility {
    pub fn toggle(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    /// Value of the input's `type` attribute.
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Hidden => "password",
            Self::Shown => "text",
        }
    }
}
