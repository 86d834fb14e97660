//! Core library for the taxi fleet service.
//!
//! This crate provides the manufacturer, car and driver models, their
//! validation rules, search filtering, pagination and the SQLite-backed
//! database operations, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use taxi_core::db::Database;
//! use taxi_core::filter::resolve_filter;
//! use taxi_core::models::*;
//! use taxi_core::pagination::PageRequest;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let toyota = db.create_manufacturer(ManufacturerInput::new("Toyota", "Japan"))?;
//! db.create_car(CarInput::new("Corolla", toyota.id))?;
//!
//! let params = [("model".to_string(), "cor".to_string())].into();
//! let (filter, _echo) = resolve_filter(&params, "model");
//! let page = db.list_cars(&filter, PageRequest::first())?;
//! assert_eq!(page.items[0].car.to_string(), "Corolla");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod password;
pub mod validation;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{EntityKind, Error, Result};
pub use filter::{resolve_filter, FilterPredicate};
pub use pagination::{Page, PageRequest};
pub use validation::{validate_license_number, ValidationError, ValidationErrors};
