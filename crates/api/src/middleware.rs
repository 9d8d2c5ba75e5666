use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::context::RequestContext;

/// Response header echoing the id the request was logged under.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Wrap every request in a span carrying a fresh request id and log the
/// outcome once the response is ready. The id is echoed in `x-request-id`.
pub async fn request_logging(req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id(),
        method = %method,
        path = %path,
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(req).await;
        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "request rejected");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "request handled");
        }
        if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
