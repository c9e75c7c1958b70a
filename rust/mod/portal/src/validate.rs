//! Form field validators.
//!
//! Every validator is a pure function over the raw field text. A failure
//! carries the field name and the message shown next to the field.
//!
//! Two password policies coexist on purpose: account creation requires the
//! full 12-character rule, the login form only rejects obviously short
//! input. See [`PasswordPolicy`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Field names as they appear on the forms.
pub mod field {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const COLLEGE_EMAIL: &str = "collegeEmail";
    pub const ROLL_NUMBER: &str = "rollNumber";
    pub const EMPLOYEE_ID: &str = "employeeId";
    pub const DEPARTMENT: &str = "department";
    pub const PHONE: &str = "phone";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const TERMS: &str = "terms";
    pub const SECURITY: &str = "security";
    pub const ROLE: &str = "role";
}

/// Minimum password length for account creation.
pub const PASSWORD_MIN_LENGTH: usize = 12;

/// Minimum password length accepted by the login form.
pub const LOGIN_PASSWORD_MIN_LENGTH: usize = 3;

/// Characters that satisfy the "special character" password rule.
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static INSTITUTIONAL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{8,}$").unwrap());
static EMPLOYEE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{4,}$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());
static FULL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]{3,100}$").unwrap());

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

pub type FieldResult = Result<(), ValidationError>;

/// All failed checks of one form, in the order they were run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a check. Only failures are kept.
    pub fn check(&mut self, result: FieldResult) {
        if let Err(e) = result {
            self.errors.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Names of the failed fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }
}

// ---------------------------------------------------------------------------
// Identity fields
// ---------------------------------------------------------------------------

/// Strict `local@domain.tld` check used by the account forms.
pub fn validate_email(field: &'static str, value: &str) -> FieldResult {
    if EMAIL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            "Please enter a valid email address",
        ))
    }
}

/// Login form identifier: an email address or an institutional id of 8+
/// uppercase alphanumerics. Blank input passes here and fails at
/// authentication.
pub fn validate_login_identifier(value: &str) -> FieldResult {
    if value.trim().is_empty() || EMAIL.is_match(value) || INSTITUTIONAL_ID.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field::EMAIL,
            "Enter a valid email or roll number",
        ))
    }
}

/// Basic name rule: at least 3 characters of letters, spaces, hyphens and
/// apostrophes.
pub fn validate_full_name(value: &str) -> FieldResult {
    if value.trim().chars().count() < 3 {
        return Err(ValidationError::new(
            field::FULL_NAME,
            "Full name must be at least 3 characters",
        ));
    }
    if !NAME_CHARS.is_match(value) {
        return Err(ValidationError::new(
            field::FULL_NAME,
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        ));
    }
    Ok(())
}

/// Strict name rule: the basic character set, 3 to 100 characters, and at
/// least a first and last name.
pub fn validate_full_name_strict(value: &str) -> FieldResult {
    let trimmed = value.trim();
    if FULL_NAME.is_match(trimmed) && trimmed.split_whitespace().count() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field::FULL_NAME,
            "Please enter a valid full name (first and last name)",
        ))
    }
}

pub fn validate_roll_number(value: &str) -> FieldResult {
    if INSTITUTIONAL_ID.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field::ROLL_NUMBER,
            "Roll number must be 8+ alphanumeric characters",
        ))
    }
}

pub fn validate_employee_id(value: &str) -> FieldResult {
    if EMPLOYEE_ID.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field::EMPLOYEE_ID,
            "Employee ID must be 4+ alphanumeric characters",
        ))
    }
}

pub fn validate_phone(value: &str) -> FieldResult {
    if PHONE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field::PHONE,
            "Phone number must be 10 digits",
        ))
    }
}

// ---------------------------------------------------------------------------
// Generic fields
// ---------------------------------------------------------------------------

/// Non-empty after trimming.
pub fn validate_required(field: &'static str, value: &str) -> FieldResult {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "This field is required"))
    } else {
        Ok(())
    }
}

/// Checkbox that must be ticked.
pub fn validate_checked(field: &'static str, checked: bool, message: &str) -> FieldResult {
    if checked {
        Ok(())
    } else {
        Err(ValidationError::new(field, message))
    }
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Which password rule a form enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// 12+ characters with upper, lower, digit and special character.
    Registration,
    /// 3+ characters; blank passes and is rejected by authentication.
    Login,
}

impl PasswordPolicy {
    pub fn min_length(&self) -> usize {
        match self {
            Self::Registration => PASSWORD_MIN_LENGTH,
            Self::Login => LOGIN_PASSWORD_MIN_LENGTH,
        }
    }
}

/// The five password criteria, evaluated once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCriteria {
    pub min_length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordCriteria {
    pub fn evaluate(password: &str) -> Self {
        Self {
            min_length: password.chars().count() >= PASSWORD_MIN_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// Number of satisfied criteria, 0..=5.
    pub fn score(&self) -> u8 {
        [
            self.min_length,
            self.uppercase,
            self.lowercase,
            self.digit,
            self.special,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8
    }

    pub fn all(&self) -> bool {
        self.score() == 5
    }
}

/// Whether a password satisfies the account-creation rule.
pub fn is_strong_password(password: &str) -> bool {
    PasswordCriteria::evaluate(password).all()
}

pub fn validate_password(value: &str, policy: PasswordPolicy) -> FieldResult {
    match policy {
        PasswordPolicy::Registration => {
            if value.is_empty() {
                Err(ValidationError::new(field::PASSWORD, "Password is required"))
            } else if !is_strong_password(value) {
                Err(ValidationError::new(
                    field::PASSWORD,
                    format!(
                        "Password must be at least {PASSWORD_MIN_LENGTH} characters with uppercase, lowercase, numbers, and special characters"
                    ),
                ))
            } else {
                Ok(())
            }
        }
        PasswordPolicy::Login => {
            if value.trim().is_empty() || value.chars().count() >= policy.min_length() {
                Ok(())
            } else {
                Err(ValidationError::new(field::PASSWORD, "Password is required"))
            }
        }
    }
}

/// Confirmation must be present and exactly equal to the password.
pub fn validate_confirmation(password: &str, confirmation: &str) -> FieldResult {
    if confirmation.is_empty() {
        Err(ValidationError::new(
            field::CONFIRM_PASSWORD,
            "Please confirm your password",
        ))
    } else if confirmation != password {
        Err(ValidationError::new(
            field::CONFIRM_PASSWORD,
            "Passwords do not match",
        ))
    } else {
        Ok(())
    }
}

/// Advisory strength band shown while typing. Not the submission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => Self::Weak,
            3..=4 => Self::Medium,
            _ => Self::Strong,
        }
    }

    /// CSS class of the strength meter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Weak => "Weak - Add more variety",
            Self::Medium => "Medium - Could be stronger",
            Self::Strong => "Strong - Good password!",
        }
    }
}

/// Strength of a password; `None` for empty input (meter hidden).
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }
    Some(PasswordStrength::from_score(
        PasswordCriteria::evaluate(password).score(),
    ))
}
