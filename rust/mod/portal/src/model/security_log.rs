use serde::{Deserialize, Serialize};

/// Event type tags written to the security log.
pub mod event {
    pub const LOGIN_PAGE_VISITED: &str = "LOGIN_PAGE_VISITED";
    pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
    pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
    pub const LOGOUT: &str = "LOGOUT";

    pub const REGISTRATION_PAGE_LOADED: &str = "REGISTRATION_PAGE_LOADED";
    pub const ROLE_SELECTED: &str = "ROLE_SELECTED";
    pub const REGISTRATION_VALIDATION_FAILED: &str = "REGISTRATION_VALIDATION_FAILED";
    pub const REGISTRATION_SUCCESSFUL: &str = "REGISTRATION_SUCCESSFUL";

    pub const SIGNUP_PAGE_VISITED: &str = "SIGNUP_PAGE_VISITED";
    pub const SIGNUP_FORM_SUBMITTED: &str = "SIGNUP_FORM_SUBMITTED";
    pub const USER_REGISTERED: &str = "USER_REGISTERED";

    pub const REQUEST_SUBMITTED: &str = "REQUEST_SUBMITTED";
    pub const REQUEST_APPROVED: &str = "REQUEST_APPROVED";
    pub const REQUEST_REJECTED: &str = "REQUEST_REJECTED";
}

/// One entry of the capped security log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityLogEntry {
    /// RFC 3339.
    pub timestamp: String,

    pub event_type: String,

    /// Role selected on the page, when the page has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Free-form detail map.
    #[serde(default)]
    pub details: serde_json::Value,

    /// Page that produced the event (`login`, `registration`, `signup/student`, ...).
    pub page: String,

    pub user_agent: String,
}
