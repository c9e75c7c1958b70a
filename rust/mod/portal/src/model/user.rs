use serde::{Deserialize, Serialize};

/// Portal role. Students file requests; faculty and admins are staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Faculty, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Faculty and admins identify with an employee id instead of a roll number.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Faculty | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account, as stored in the `registered_users` list.
///
/// The password is kept in cleartext; this is a demo portal with no real
/// authentication backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// `user_` followed by a random suffix.
    pub id: String,

    #[serde(alias = "name")]
    pub full_name: String,

    pub email: String,

    pub role: Role,

    /// Older records written by the unified registration page carry no
    /// password; such accounts can never log in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Students only.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "roll")]
    pub roll_number: Option<String>,

    /// Faculty and admins only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// Never set by the portal itself.
    #[serde(default)]
    pub verified: bool,
}

/// Input for registering a new account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub password: String,
    pub roll_number: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}
