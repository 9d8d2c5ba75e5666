use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use mockrest_core::{DomainError, Record};

use crate::app::errors::ApiError;

/// Turn an extracted JSON body into a record, rejecting anything that is
/// not a well-formed JSON object.
pub fn record_from(body: Result<Json<Value>, JsonRejection>) -> Result<Record, ApiError> {
    match body {
        Ok(Json(Value::Object(record))) => Ok(record),
        Ok(Json(_)) => Err(DomainError::malformed_body("Request body must be a JSON object.").into()),
        Err(rejection) => Err(DomainError::malformed_body(rejection.body_text()).into()),
    }
}

pub fn records_to_json(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
