//! Wildcard capture endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    Json,
};
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::capture::{normalize, HttpInbound};
use crate::error::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::record::WebhookId;

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub id: WebhookId,
}

/// Route prefix stripped before the remainder is stored as `pathname`.
const CAPTURE_PREFIX: &str = "/capture";

/// `/capture`, `/capture/` and `/capture/{*path}`.
///
/// The remainder is read from the raw URI rather than a `Path` extractor, so
/// segments that do not decode to UTF-8 are still captured.
pub async fn capture_request(
    State(state): State<AppState>,
    request: Request<Body>,
) -> ApiResult<(StatusCode, Json<CaptureResponse>)> {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.capture.max_body_size).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!(error = %e, "Capture body unreadable");
            None
        }
    };

    // HEAD is served by the GET endpoint and recorded as such.
    let method = if parts.method == Method::HEAD {
        Method::GET
    } else {
        parts.method
    };

    let inbound = HttpInbound::new(
        method,
        capture_remainder(parts.uri.path()),
        parts.headers,
        parts.uri.query().map(str::to_owned),
        body,
    );
    let record = normalize(&inbound, &state.capture);
    let method = record.method.clone();
    let pathname = record.pathname.clone();

    let id = state.store.insert(record).await.map_err(|e| {
        metrics::record_capture_failure();
        ApiError::store("Failed to capture webhook")(e)
    })?;

    metrics::record_capture(&method);
    tracing::info!(id = %id, method = %method, pathname = %pathname, "Webhook captured");

    Ok((StatusCode::CREATED, Json(CaptureResponse { id })))
}

/// Percent-decoded path below the capture prefix, segments joined by `/`.
fn capture_remainder(path: &str) -> String {
    path.strip_prefix(CAPTURE_PREFIX)
        .unwrap_or(path)
        .split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
