//! Taxi fleet administration service.
//!
//! The HTTP API lives here; models, validation and persistence come from
//! [`taxi_core`], re-exported below.

pub mod api;
pub mod config;

pub use taxi_core::{db, models};
