//! Generic REST routes over every collection in the datastore.
//!
//! `GET/POST /:collection`, `GET/PUT/PATCH/DELETE /:collection/:id`. Writes
//! pass through the service's interceptor before they reach the store.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use mockrest_core::WriteContext;
use mockrest_infra::{ListQuery, UpdateMode};

use crate::app::{dto, errors::ApiError, services::AppServices};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

pub fn router() -> Router {
    Router::new()
        .route("/:collection", get(list_records).post(create_record))
        .route(
            "/:collection/:id",
            get(get_record)
                .put(replace_record)
                .patch(patch_record)
                .delete(delete_record),
        )
}

pub async fn list_records(
    Extension(services): Extension<Arc<AppServices>>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = ListQuery::from_params(params);
    let page = services.store().list(&collection, &query)?;

    let mut response = Json(dto::records_to_json(page.items)).into_response();
    if page.paginated {
        response
            .headers_mut()
            .insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total));
    }
    Ok(response)
}

pub async fn get_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    match services.store().get(&collection, &id)? {
        Some(record) => Ok(Json(Value::Object(record))),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path(collection): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = dto::record_from(body)?;
    let now = Utc::now();

    let record = services.store().insert_with(&collection, |db| {
        let ctx = WriteContext::new(&collection, db, now);
        services
            .interceptor()
            .on_create(&ctx, body)
            .map_err(ApiError::from)
    })?;

    Ok((StatusCode::CREATED, Json(Value::Object(record))).into_response())
}

pub async fn replace_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path((collection, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    update_record(&services, &collection, &id, UpdateMode::Replace, body)
}

pub async fn patch_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path((collection, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    update_record(&services, &collection, &id, UpdateMode::Merge, body)
}

fn update_record(
    services: &AppServices,
    collection: &str,
    id: &str,
    mode: UpdateMode,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = dto::record_from(body)?;
    let now = Utc::now();

    let updated = services
        .store()
        .update_with(collection, id, mode, body, |db, patch, existing| {
            let ctx = WriteContext::new(collection, db, now).replacing(mode == UpdateMode::Replace);
            services
                .interceptor()
                .on_update(&ctx, patch, existing)
                .map_err(ApiError::from)
        })?;

    updated
        .map(|record| Json(Value::Object(record)))
        .ok_or(ApiError::NotFound)
}

pub async fn delete_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    match services.store().remove(&collection, &id)? {
        Some(_) => Ok(Json(json!({}))),
        None => Err(ApiError::NotFound),
    }
}
