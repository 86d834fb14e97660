use std::fmt;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{required_text, ValidationErrors, MAX_TEXT_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

impl Resource for Manufacturer {
    const PLURAL: &'static str = "manufacturers";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Used for both create and update; every field is always submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManufacturerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

impl ManufacturerInput {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn validate(&self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &self.name, MAX_TEXT_LEN);
        let country = required_text(&mut errors, "country", &self.country, MAX_TEXT_LEN);
        errors.finish(Self { name, country })
    }
}
