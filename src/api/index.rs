use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::{ApiError, AppState, CurrentSession};
use crate::models::FleetSummary;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    #[serde(flatten)]
    pub summary: FleetSummary,
    /// Index views in the caller's session, including this one.
    pub num_visits: u32,
}

pub async fn index(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<Json<IndexResponse>, ApiError> {
    let summary = state.db.fleet_summary()?;
    let num_visits = state.db.record_visit(current.session.token)?;
    Ok(Json(IndexResponse {
        summary,
        num_visits,
    }))
}
