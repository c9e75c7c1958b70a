use serde::{Deserialize, Serialize};

use super::user::Role;

/// Transient login state. Cleared at logout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFlags {
    pub authenticated: bool,
    pub email: String,
    pub role: Option<Role>,
    /// RFC 3339.
    pub login_time: String,
}

/// Snapshot of the logged-in student shown in the dashboard sidebar,
/// stored under `studentData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub roll: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl StudentProfile {
    /// Shown when nobody has logged in on this device.
    pub fn placeholder() -> Self {
        Self {
            name: "Student User".to_string(),
            roll: "2024001".to_string(),
            email: "student@college.edu".to_string(),
            role: None,
        }
    }
}
