use serde::{Deserialize, Serialize};

use campus_core::{now_millis, now_rfc3339};

// ---------------------------------------------------------------------------
// RequestKind
// ---------------------------------------------------------------------------

/// What a student is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Complaint,
    Bonafide,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::Bonafide => "bonafide",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Review state of a request.
///
/// ```text
/// Pending → Approved
///         → Rejected
/// ```
///
/// Both outcomes are terminal for students. Dev-mode actions may overwrite
/// either one; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Lenient parse of a stored status string. `approved` and `resolved`
    /// (any case) mean approved, `rejected` means rejected, anything else
    /// is treated as pending.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" | "resolved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// CSS class of the status badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

impl From<Option<String>> for RequestStatus {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<RequestStatus> for String {
    fn from(s: RequestStatus) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A complaint or bonafide-certificate application.
///
/// Requests are not linked to the submitting account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// `REQ` + the low six digits of the submission time in milliseconds.
    /// Unique only in practice; two submissions in the same millisecond
    /// modulo 10^6 collide.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RequestKind,

    /// Machine form of the purpose, e.g. `library_fine`.
    pub purpose: String,

    pub description: String,

    #[serde(default)]
    pub status: RequestStatus,

    /// Rejection reason; empty unless rejected.
    #[serde(default)]
    pub reason: String,

    /// RFC 3339 submission timestamp.
    pub date: String,
}

impl Request {
    /// Build a fresh Pending request stamped with the current time.
    pub fn new(kind: RequestKind, purpose: &str, description: &str) -> Self {
        Self {
            id: request_id(now_millis()),
            kind,
            purpose: purpose.to_string(),
            description: description.to_string(),
            status: RequestStatus::Pending,
            reason: String::new(),
            date: now_rfc3339(),
        }
    }
}

/// Derive a request identifier from a millisecond timestamp.
pub fn request_id(millis: i64) -> String {
    let digits = millis.to_string();
    let tail = &digits[digits.len().saturating_sub(6)..];
    format!("REQ{tail}")
}
