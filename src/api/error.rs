use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Core(#[from] taxi_core::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use taxi_core::Error as Core;

        let (status, body) = match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Authentication credentials were not provided or are invalid." }),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Please enter a correct username and password." }),
            ),
            Self::Core(Core::Validation(errors)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "errors": errors }))
            }
            Self::Core(Core::ConstraintViolation(detail)) => {
                tracing::warn!("Rejected write: {}", detail);
                (
                    StatusCode::CONFLICT,
                    json!({ "error": "The submitted data conflicts with an existing record." }),
                )
            }
            Self::Core(Core::NotFound { kind, .. }) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} not found", capitalize(kind.as_str())) }),
            ),
            Self::Core(err @ (Core::Database(_) | Core::PasswordHash(_))) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
