//! JSON HTTP API. Routes mirror the screens of the fleet admin site; every
//! route except `/login/` needs a session token.

mod auth;
mod cars;
mod drivers;
mod error;
mod index;
mod manufacturers;

use std::collections::BTreeMap;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use taxi_core::{Database, Page};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use auth::{CurrentSession, LoginRequest, LoginResponse};
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/login/", post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/", get(index::index))
        .route("/manufacturers/", get(manufacturers::list))
        .route("/manufacturers/create/", post(manufacturers::create))
        .route("/manufacturers/{id}/", get(manufacturers::detail))
        .route("/manufacturers/{id}/update/", post(manufacturers::update))
        .route("/manufacturers/{id}/delete/", post(manufacturers::delete))
        .route("/cars/", get(cars::list))
        .route("/cars/create/", post(cars::create))
        .route("/cars/{id}/", get(cars::detail))
        .route("/cars/{id}/update/", post(cars::update))
        .route("/cars/{id}/delete/", post(cars::delete))
        .route("/cars/{id}/toggle-assign/", post(cars::toggle_assign))
        .route("/drivers/", get(drivers::list))
        .route("/drivers/create/", post(drivers::create))
        .route("/drivers/{id}/", get(drivers::detail))
        .route("/drivers/{id}/update/", post(drivers::update_license))
        .route("/drivers/{id}/delete/", post(drivers::delete))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(AppState { db })
}

/// A page of results plus the submitted search value, keyed by the
/// searched field, for redisplay in the search box.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub search: BTreeMap<&'static str, String>,
}

impl<T> ListResponse<T> {
    fn new(page: Page<T>, field: &'static str, echo: String) -> Self {
        Self {
            page,
            search: BTreeMap::from([(field, echo)]),
        }
    }
}

/// Result of a write: the affected entity, if any, and where the client
/// should go next.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    pub location: String,
}

impl<T> Mutation<T> {
    fn new(item: T, location: String) -> Self {
        Self {
            item: Some(item),
            location,
        }
    }
}

impl Mutation<()> {
    fn redirect(location: String) -> Self {
        Self {
            item: None,
            location,
        }
    }
}
