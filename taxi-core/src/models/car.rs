use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Driver, Manufacturer, Resource};
use crate::validation::{required_text, ValidationErrors, MAX_TEXT_LEN, REQUIRED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub manufacturer_id: i64,
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model)
    }
}

impl Resource for Car {
    const PLURAL: &'static str = "cars";

    fn id(&self) -> i64 {
        self.id
    }
}

/// A list row: the car joined with its manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWithManufacturer {
    #[serde(flatten)]
    pub car: Car,
    pub manufacturer: Manufacturer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: Car,
    pub manufacturer: Manufacturer,
    /// Ordered by username.
    pub drivers: Vec<Driver>,
}

impl CarDetail {
    pub fn is_assigned_to(&self, driver_id: i64) -> bool {
        self.drivers.iter().any(|d| d.id == driver_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarInput {
    #[serde(default)]
    pub model: String,
    pub manufacturer_id: Option<i64>,
    /// Replaces the car's current assignments.
    #[serde(default)]
    pub driver_ids: Vec<i64>,
}

impl CarInput {
    pub fn new(model: impl Into<String>, manufacturer_id: i64) -> Self {
        Self {
            model: model.into(),
            manufacturer_id: Some(manufacturer_id),
            driver_ids: Vec::new(),
        }
    }

    pub fn with_drivers(mut self, driver_ids: impl IntoIterator<Item = i64>) -> Self {
        self.driver_ids = driver_ids.into_iter().collect();
        self
    }

    /// Field checks that need no database access. Whether the manufacturer
    /// and drivers exist is checked by the database layer.
    pub fn validate(&self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let model = required_text(&mut errors, "model", &self.model, MAX_TEXT_LEN);
        if self.manufacturer_id.is_none() {
            errors.add("manufacturer", REQUIRED);
        }

        let mut driver_ids = self.driver_ids.clone();
        driver_ids.sort_unstable();
        driver_ids.dedup();

        errors.finish(Self {
            model,
            manufacturer_id: self.manufacturer_id,
            driver_ids,
        })
    }
}
