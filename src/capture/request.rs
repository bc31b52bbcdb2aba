//! Framework-independent view of an inbound request.
//!
//! The normalizer only sees this capability, so it can be exercised without
//! a running server and reused behind another transport.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use std::borrow::Cow;

/// What the normalizer needs to know about a request.
pub trait InboundRequest {
    /// HTTP verb, e.g. `POST`.
    fn method(&self) -> &str;

    /// Path segments below the capture route, in order.
    fn path_segments(&self) -> Vec<&str>;

    /// Every header occurrence, in arrival order. Names are lowercase.
    fn headers(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)>;

    /// Decoded query parameters, in arrival order, repeats included.
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Raw body. `None` when the body could not be read.
    fn body(&self) -> Option<&[u8]>;
}

/// An HTTP request already taken apart by the server.
#[derive(Debug, Clone)]
pub struct HttpInbound {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Option<String>,
    body: Option<Bytes>,
}

impl HttpInbound {
    /// Assemble from extracted parts.
    ///
    /// `path` is the wildcard remainder without the capture prefix;
    /// `query` is the raw query string without the leading `?`.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        query: Option<String>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            query,
            body,
        }
    }
}

impl InboundRequest for HttpInbound {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path_segments(&self) -> Vec<&str> {
        self.path.split('/').collect()
    }

    fn headers(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes())))
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        match &self.query {
            Some(q) => url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            None => Vec::new(),
        }
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
