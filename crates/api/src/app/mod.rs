//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: datastore and per-service rule wiring
//! - `routes/`: HTTP routes + handlers (generic collections, service extras)
//! - `dto.rs`: request body mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router for one service (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let kind = services.kind();

    routes::router(kind)
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}
