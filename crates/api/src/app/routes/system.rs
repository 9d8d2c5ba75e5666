use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde_json::Value;

use crate::app::dto::HealthResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: services.kind().name(),
    })
}

/// The whole datastore document.
pub async fn database(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Value>, ApiError> {
    Ok(Json(Value::Object(services.store().snapshot()?)))
}
