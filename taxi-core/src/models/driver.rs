use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CarWithManufacturer, Resource};
use crate::validation::{
    optional_text, validate_license_field, validate_new_password, validate_username,
    ValidationErrors, MAX_TEXT_LEN,
};

/// A driver is also the login account. The password hash never leaves the
/// database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub date_joined: DateTime<Utc>,
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.username, self.first_name, self.last_name
        )
    }
}

impl Resource for Driver {
    const PLURAL: &'static str = "drivers";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDetail {
    #[serde(flatten)]
    pub driver: Driver,
    /// Ordered by model.
    pub cars: Vec<CarWithManufacturer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDriverInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// The cleaned result of [`CreateDriverInput::validate`], ready to persist.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub username: String,
    pub password: String,
    pub license_number: String,
    pub first_name: String,
    pub last_name: String,
}

impl CreateDriverInput {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        license_number: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            password1: password.clone(),
            password2: password,
            license_number: license_number.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn validate(&self) -> Result<NewDriver, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = validate_username(&mut errors, &self.username);
        validate_new_password(&mut errors, &self.password1, &self.password2);
        let license_number = validate_license_field(&mut errors, &self.license_number);
        let first_name = optional_text(&mut errors, "first_name", &self.first_name, MAX_TEXT_LEN);
        let last_name = optional_text(&mut errors, "last_name", &self.last_name, MAX_TEXT_LEN);

        errors.finish(NewDriver {
            username,
            password: self.password1.clone(),
            license_number,
            first_name,
            last_name,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLicenseInput {
    #[serde(default)]
    pub license_number: String,
}

impl UpdateLicenseInput {
    pub fn new(license_number: impl Into<String>) -> Self {
        Self {
            license_number: license_number.into(),
        }
    }

    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let license_number = validate_license_field(&mut errors, &self.license_number);
        errors.finish(license_number)
    }
}
