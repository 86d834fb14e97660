//! Field validation shared by every create and update operation.
//!
//! Validation runs before any SQL is issued. Uniqueness is deliberately not
//! part of it: duplicate usernames and license numbers are rejected by the
//! database and surface as [`Error::ConstraintViolation`](crate::Error).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub const LICENSE_NUMBER_LEN: usize = 8;
const LICENSE_PREFIX_LEN: usize = 3;

pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// A single failed rule, scoped to the field it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Field name to messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn push(&mut self, error: ValidationError) {
        self.add(error.field, error.message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(error);
        errors
    }
}

/// Checks the `AAA00000` license format and hands the value back untouched.
pub fn validate_license_number(value: &str) -> Result<String, ValidationError> {
    const FIELD: &str = "license_number";

    let chars: Vec<char> = value.chars().collect();
    if chars.len() != LICENSE_NUMBER_LEN {
        return Err(ValidationError::new(
            FIELD,
            "Ensure that value has 8 characters",
        ));
    }

    let (prefix, digits) = chars.split_at(LICENSE_PREFIX_LEN);
    if !prefix.iter().all(char::is_ascii_uppercase) {
        return Err(ValidationError::new(
            FIELD,
            "First 3 characters should be uppercase letters",
        ));
    }
    if !digits.iter().all(char::is_ascii_digit) {
        return Err(ValidationError::new(
            FIELD,
            "Last 5 characters should be digits",
        ));
    }

    Ok(value.to_string())
}

/// Trims `value` and records an error if it is empty or longer than `max_len`.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max_len: usize,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    } else {
        check_max_len(errors, field, trimmed, max_len);
    }
    trimmed.to_string()
}

/// Like [`required_text`] but an empty value is accepted.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max_len: usize,
) -> String {
    let trimmed = value.trim();
    check_max_len(errors, field, trimmed, max_len);
    trimmed.to_string()
}

fn check_max_len(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) {
    let len = value.chars().count();
    if len > max_len {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_len, len
            ),
        );
    }
}

pub fn validate_username(errors: &mut ValidationErrors, value: &str) -> String {
    let username = required_text(errors, "username", value, MAX_USERNAME_LEN);
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    username
}

/// Password fields are not trimmed. Strength problems land on `password2`.
pub fn validate_new_password(errors: &mut ValidationErrors, password1: &str, password2: &str) {
    if password1.is_empty() {
        errors.add("password1", REQUIRED);
    }
    if password2.is_empty() {
        errors.add("password2", REQUIRED);
    }
    if password1.is_empty() || password2.is_empty() {
        return;
    }

    if password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
        return;
    }

    if password2.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password2",
            format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LEN
            ),
        );
    }
    if password2.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password2", "This password is entirely numeric.");
    }
}

pub fn validate_license_field(errors: &mut ValidationErrors, value: &str) -> String {
    if value.is_empty() {
        errors.add("license_number", REQUIRED);
        return String::new();
    }
    match validate_license_number(value) {
        Ok(valid) => valid,
        Err(err) => {
            errors.push(err);
            value.to_string()
        }
    }
}
