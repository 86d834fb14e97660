use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::models::{Driver, Session};

/// The authenticated caller, resolved from an `Authorization: Bearer`
/// session token.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
    pub driver: Driver,
}

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let session = state.db.get_session(token)?.ok_or(ApiError::Unauthorized)?;
        let driver = state
            .db
            .get_driver(session.driver_id)?
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self { session, driver })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub driver: Driver,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let driver = state
        .db
        .authenticate(&req.username, &req.password)?
        .ok_or(ApiError::InvalidCredentials)?;
    let session = state.db.create_session(driver.id)?;
    tracing::info!(driver_id = driver.id, "Driver logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        driver,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.delete_session(current.session.token)?;
    tracing::info!(driver_id = current.driver.id, "Driver logged out");
    Ok(Json(serde_json::json!({ "location": "/login/" })))
}
