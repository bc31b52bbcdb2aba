//! Turns an inbound request into a storable record.
//!
//! # Responsibilities
//! - Rebuild the captured path from wildcard segments
//! - Resolve a best-effort client address from proxy headers
//! - Flatten headers and query parameters (last value wins)
//! - Decode the body: pretty JSON when possible, raw text otherwise
//!
//! # Design Decisions
//! - Never fails: malformed or unreadable bodies degrade to raw text or null
//! - `query_params` is `None`, not an empty map, when no parameters were sent

use crate::capture::request::InboundRequest;
use crate::config::CaptureConfig;
use crate::observability::metrics;
use crate::record::{FlatMap, NewWebhook, DEFAULT_STATUS_CODE};

/// Client address recorded when no address header is present.
pub const UNKNOWN_IP: &str = "unknown";

/// Normalize a request into a [`NewWebhook`].
pub fn normalize<R: InboundRequest>(request: &R, config: &CaptureConfig) -> NewWebhook {
    let headers = flatten_headers(request);
    let query = flatten_query(request);

    let content_type = headers.get("content-type").cloned();
    let content_length = headers
        .get("content-length")
        .and_then(|v| v.trim().parse::<i64>().ok());

    NewWebhook {
        method: request.method().to_ascii_uppercase(),
        pathname: build_pathname(&request.path_segments()),
        ip: resolve_ip(&headers, &config.client_ip_headers),
        status_code: DEFAULT_STATUS_CODE,
        content_type: content_type.clone(),
        content_length,
        query_params: if query.is_empty() { None } else { Some(query) },
        body: decode_body(request.body(), content_type.as_deref()),
        headers,
    }
}

/// Join non-empty segments under a single leading slash.
pub fn build_pathname(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

fn flatten_headers<R: InboundRequest>(request: &R) -> FlatMap {
    let mut map = FlatMap::new();
    for (name, value) in request.headers() {
        map.insert(name.to_ascii_lowercase(), value.into_owned());
    }
    map
}

fn flatten_query<R: InboundRequest>(request: &R) -> FlatMap {
    request.query_pairs().into_iter().collect()
}

/// First configured header with a non-blank value, else [`UNKNOWN_IP`].
fn resolve_ip(headers: &FlatMap, candidates: &[String]) -> String {
    candidates
        .iter()
        .filter_map(|name| headers.get(&name.to_ascii_lowercase()))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Decode a body for storage.
///
/// Returns `None` for empty or unreadable bodies.
pub fn decode_body(body: Option<&[u8]>, content_type: Option<&str>) -> Option<String> {
    let Some(bytes) = body else {
        tracing::debug!("Request body unreadable, storing null");
        metrics::record_body_fallback("unreadable");
        return None;
    };
    if bytes.is_empty() {
        return None;
    }

    if is_json(content_type) {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => return Some(pretty),
                Err(e) => tracing::debug!(error = %e, "Failed to re-serialize JSON body"),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Body is not valid JSON, storing raw text");
                metrics::record_body_fallback("invalid_json");
            }
        }
    }

    Some(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::request::HttpInbound;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, HeaderValue, Method};

    fn inbound(
        path: &str,
        headers: &[(&'static str, &'static str)],
        query: Option<&str>,
        body: Option<&'static str>,
    ) -> HttpInbound {
        let mut map = HeaderMap::new();
        for (k, v) in headers {
            map.append(*k, HeaderValue::from_static(v));
        }
        HttpInbound::new(
            Method::POST,
            path,
            map,
            query.map(str::to_string),
            body.map(|b| Bytes::from_static(b.as_bytes())),
        )
    }

    #[test]
    fn json_body_is_pretty_printed() {
        let req = inbound(
            "orders/123",
            &[("content-type", "application/json")],
            Some("x=1"),
            Some(r#"{"a":1}"#),
        );
        let record = normalize(&req, &CaptureConfig::default());

        assert_eq!(record.pathname, "/orders/123");
        assert_eq!(record.body.as_deref(), Some("{\n  \"a\": 1\n}"));
        let query = record.query_params.unwrap();
        assert_eq!(query.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn json_key_order_is_preserved() {
        let req = inbound(
            "",
            &[("content-type", "application/json; charset=utf-8")],
            None,
            Some(r#"{"zeta":1,"alpha":2}"#),
        );
        let body = normalize(&req, &CaptureConfig::default()).body.unwrap();
        assert!(body.find("zeta").unwrap() < body.find("alpha").unwrap());
    }

    #[test]
    fn invalid_json_falls_back_to_raw_text() {
        let req = inbound("", &[("content-type", "application/json")], None, Some("{not json"));
        let record = normalize(&req, &CaptureConfig::default());
        assert_eq!(record.body.as_deref(), Some("{not json"));
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let req = inbound("", &[("content-type", "text/plain")], None, Some(r#"{"a":1}"#));
        let record = normalize(&req, &CaptureConfig::default());
        assert_eq!(record.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn empty_or_unreadable_body_is_null() {
        let empty = inbound("", &[("content-type", "application/json")], None, Some(""));
        assert!(normalize(&empty, &CaptureConfig::default()).body.is_none());

        let unreadable = inbound("", &[], None, None);
        assert!(normalize(&unreadable, &CaptureConfig::default()).body.is_none());
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let body = decode_body(Some(&[b'h', b'i', 0xff]), Some("text/plain")).unwrap();
        assert!(body.starts_with("hi"));
        assert!(body.contains('\u{fffd}'));
    }

    #[test]
    fn missing_query_is_absent_not_empty() {
        let none = normalize(&inbound("", &[], None, None), &CaptureConfig::default());
        assert!(none.query_params.is_none());

        let blank = normalize(&inbound("", &[], Some(""), None), &CaptureConfig::default());
        assert!(blank.query_params.is_none());

        let empty_value = normalize(&inbound("", &[], Some("x="), None), &CaptureConfig::default());
        let params = empty_value.query_params.unwrap();
        assert_eq!(params.get("x").map(String::as_str), Some(""));
    }

    #[test]
    fn repeated_values_last_one_wins() {
        let req = inbound(
            "",
            &[("x-tag", "first"), ("x-tag", "second")],
            Some("k=1&k=2"),
            None,
        );
        let record = normalize(&req, &CaptureConfig::default());
        assert_eq!(record.headers.get("x-tag").map(String::as_str), Some("second"));
        assert_eq!(
            record.query_params.unwrap().get("k").map(String::as_str),
            Some("2")
        );
    }

    #[test]
    fn ip_prefers_connecting_ip_header() {
        let req = inbound(
            "",
            &[("x-forwarded-for", "10.0.0.2"), ("cf-connecting-ip", "203.0.113.9")],
            None,
            None,
        );
        assert_eq!(normalize(&req, &CaptureConfig::default()).ip, "203.0.113.9");
    }

    #[test]
    fn ip_falls_back_to_forwarded_for_then_unknown() {
        let forwarded = inbound("", &[("x-forwarded-for", "10.0.0.2, 10.0.0.1")], None, None);
        assert_eq!(
            normalize(&forwarded, &CaptureConfig::default()).ip,
            "10.0.0.2, 10.0.0.1"
        );

        let bare = inbound("", &[], None, None);
        assert_eq!(normalize(&bare, &CaptureConfig::default()).ip, UNKNOWN_IP);
    }

    #[test]
    fn content_metadata_mirrors_headers() {
        let req = inbound(
            "",
            &[("content-type", "text/plain"), ("content-length", "5")],
            None,
            Some("hello"),
        );
        let record = normalize(&req, &CaptureConfig::default());
        assert_eq!(record.content_type.as_deref(), Some("text/plain"));
        assert_eq!(record.content_length, Some(5));
        assert_eq!(record.status_code, 200);
    }

    #[test]
    fn bogus_content_length_is_absent() {
        let req = inbound("", &[("content-length", "lots")], None, None);
        assert!(normalize(&req, &CaptureConfig::default()).content_length.is_none());
    }

    #[test]
    fn pathname_drops_empty_segments() {
        assert_eq!(build_pathname(&[]), "/");
        assert_eq!(build_pathname(&[""]), "/");
        assert_eq!(build_pathname(&["a", "", "b", ""]), "/a/b");
    }
}
