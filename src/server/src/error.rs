use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    InternalError(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::PhaseViolation(_) | CoreError::CapViolation(_) | CoreError::InvalidTransaction(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::PersistenceFailure(_) | CoreError::SimulatorFailure(_) | CoreError::DuplicateEvent(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
