use axum::{routing::get, Router};

use crate::config::ServiceKind;

pub mod collections;
pub mod system;
pub mod tasks;

/// Router for one service: fixed system routes, the service's extra routes,
/// then the generic collection routes.
pub fn router(kind: ServiceKind) -> Router {
    let router = Router::new()
        .route("/health", get(system::health))
        .route("/db", get(system::database));

    let router = match kind {
        ServiceKind::Tasks => router.merge(tasks::router()),
        ServiceKind::Posts | ServiceKind::Users => router,
    };

    router.merge(collections::router())
}
