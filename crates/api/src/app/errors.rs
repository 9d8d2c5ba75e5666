use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use mockrest_core::DomainError;
use mockrest_infra::StoreError;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A write failed validation.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The collection or record does not exist.
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownCollection(_) => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(StoreError::DuplicateId { .. }) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "datastore failure");
        }
        json_error(status, self.to_string())
    }
}

/// `{ "error": message }` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}
