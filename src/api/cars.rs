use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taxi_core::{resolve_filter, EntityKind, Error, PageRequest};

use super::{ApiError, AppState, CurrentSession, ListResponse, Mutation};
use crate::models::{resource_path, AssignmentState, Car, CarDetail, CarInput, CarWithManufacturer, Resource};

const SEARCH_FIELD: &str = "model";

pub async fn list(
    State(state): State<AppState>,
    _current: CurrentSession,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<CarWithManufacturer>>, ApiError> {
    let (filter, echo) = resolve_filter(&params, SEARCH_FIELD);
    let page = state
        .db
        .list_cars(&filter, PageRequest::from_params(&params)?)?;
    Ok(Json(ListResponse::new(page, SEARCH_FIELD, echo)))
}

#[derive(Debug, Serialize)]
pub struct CarDetailResponse {
    #[serde(flatten)]
    pub detail: CarDetail,
    /// Whether the caller is among the car's drivers.
    pub assigned_to_me: bool,
}

pub async fn detail(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<CarDetailResponse>, ApiError> {
    let detail = state
        .db
        .get_car_detail(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Car, id))?;
    Ok(Json(CarDetailResponse {
        assigned_to_me: detail.is_assigned_to(current.driver.id),
        detail,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    _current: CurrentSession,
    Json(input): Json<CarInput>,
) -> Result<(StatusCode, Json<Mutation<Car>>), ApiError> {
    let car = state.db.create_car(input)?;
    Ok((StatusCode::CREATED, Json(Mutation::new(car, Car::list_path()))))
}

pub async fn update(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<CarInput>,
) -> Result<Json<Mutation<Car>>, ApiError> {
    let car = state.db.update_car(id, input)?;
    Ok(Json(Mutation::new(car, Car::list_path())))
}

pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Mutation<()>>, ApiError> {
    state.db.delete_car(id)?;
    Ok(Json(Mutation::redirect(Car::list_path())))
}

/// Assigns the caller to the car, or unassigns them if already assigned.
pub async fn toggle_assign(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Mutation<AssignmentState>>, ApiError> {
    let assignment = state.db.toggle_assignment(current.driver.id, id)?;
    Ok(Json(Mutation::new(assignment, resource_path(Car::PLURAL, id))))
}
