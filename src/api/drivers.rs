use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use taxi_core::{resolve_filter, EntityKind, Error, PageRequest};

use super::{ApiError, AppState, CurrentSession, ListResponse, Mutation};
use crate::models::{CreateDriverInput, Driver, DriverDetail, Resource, UpdateLicenseInput};

const SEARCH_FIELD: &str = "username";

pub async fn list(
    State(state): State<AppState>,
    _current: CurrentSession,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<Driver>>, ApiError> {
    let (filter, echo) = resolve_filter(&params, SEARCH_FIELD);
    let page = state
        .db
        .list_drivers(&filter, PageRequest::from_params(&params)?)?;
    Ok(Json(ListResponse::new(page, SEARCH_FIELD, echo)))
}

pub async fn detail(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<DriverDetail>, ApiError> {
    let detail = state
        .db
        .get_driver_detail(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Driver, id))?;
    Ok(Json(detail))
}

/// Responds with the new driver's own detail path as the next location.
pub async fn create(
    State(state): State<AppState>,
    _current: CurrentSession,
    Json(input): Json<CreateDriverInput>,
) -> Result<(StatusCode, Json<Mutation<Driver>>), ApiError> {
    let driver = state.db.create_driver(input)?;
    let location = driver.resource_path();
    Ok((StatusCode::CREATED, Json(Mutation::new(driver, location))))
}

pub async fn update_license(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<UpdateLicenseInput>,
) -> Result<Json<Mutation<Driver>>, ApiError> {
    let driver = state.db.update_driver_license(id, input)?;
    Ok(Json(Mutation::new(driver, Driver::list_path())))
}

pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Mutation<()>>, ApiError> {
    state.db.delete_driver(id)?;
    Ok(Json(Mutation::redirect(Driver::list_path())))
}
