use std::fmt;

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::validation::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more fields failed validation before anything was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// SQLite rejected a write because of a uniqueness or foreign key rule.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("database error: {0}")]
    Database(rusqlite::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                tracing::debug!("constraint violation: {}", detail);
                Self::ConstraintViolation(detail)
            }
            other => Self::Database(other),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Manufacturer,
    Car,
    Driver,
    Session,
    Page,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "manufacturer",
            Self::Car => "car",
            Self::Driver => "driver",
            Self::Session => "session",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
