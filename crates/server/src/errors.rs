use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use models::phone_address::ErrorResponse;
use service::errors::StoreError;
use thiserror::Error;
use tracing::error;

pub const STORE_DETAIL: &str = "Storage backend unavailable.";

/// Failures of the phone-address endpoints, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Phone number not found.")]
    NotFound,
    #[error("Phone number already exists.")]
    Conflict,
    #[error("Not Found")]
    RouteNotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

// Undecodable path segments are request validation failures, same as bad bodies.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Store(e) => {
                error!(error = %e, "store command failed");
                STORE_DETAIL.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot connect to store: {0}")]
    Store(#[from] StoreError),
}
