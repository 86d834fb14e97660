use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use taxi_core::{resolve_filter, EntityKind, Error, PageRequest};

use super::{ApiError, AppState, CurrentSession, ListResponse, Mutation};
use crate::models::{Manufacturer, ManufacturerInput, Resource};

const SEARCH_FIELD: &str = "name";

pub async fn list(
    State(state): State<AppState>,
    _current: CurrentSession,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<Manufacturer>>, ApiError> {
    let (filter, echo) = resolve_filter(&params, SEARCH_FIELD);
    let page = state
        .db
        .list_manufacturers(&filter, PageRequest::from_params(&params)?)?;
    Ok(Json(ListResponse::new(page, SEARCH_FIELD, echo)))
}

pub async fn detail(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Manufacturer>, ApiError> {
    let manufacturer = state
        .db
        .get_manufacturer(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Manufacturer, id))?;
    Ok(Json(manufacturer))
}

pub async fn create(
    State(state): State<AppState>,
    _current: CurrentSession,
    Json(input): Json<ManufacturerInput>,
) -> Result<(StatusCode, Json<Mutation<Manufacturer>>), ApiError> {
    let manufacturer = state.db.create_manufacturer(input)?;
    Ok((
        StatusCode::CREATED,
        Json(Mutation::new(manufacturer, Manufacturer::list_path())),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<ManufacturerInput>,
) -> Result<Json<Mutation<Manufacturer>>, ApiError> {
    let manufacturer = state.db.update_manufacturer(id, input)?;
    Ok(Json(Mutation::new(manufacturer, Manufacturer::list_path())))
}

pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Mutation<()>>, ApiError> {
    state.db.delete_manufacturer(id)?;
    Ok(Json(Mutation::redirect(Manufacturer::list_path())))
}
