//! Captured webhook record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::WebhookId;

/// Default value of `status_code` for every captured record.
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// Single-valued view of headers or query parameters.
pub type FlatMap = BTreeMap<String, String>;

/// A normalized inbound request, ready to be persisted.
///
/// Everything except the identifier and creation time, which the store assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebhook {
    pub method: String,
    pub pathname: String,
    pub ip: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    /// `None` when the request carried no query parameters at all.
    pub query_params: Option<FlatMap>,
    pub headers: FlatMap,
    pub body: Option<String>,
}

/// A persisted webhook record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: WebhookId,
    pub method: String,
    pub pathname: String,
    pub ip: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<FlatMap>,
    pub headers: FlatMap,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Webhook {
    /// Attach an identifier and creation time to a normalized request.
    pub fn from_new(id: WebhookId, created_at: DateTime<Utc>, new: NewWebhook) -> Self {
        Self {
            id,
            method: new.method,
            pathname: new.pathname,
            ip: new.ip,
            status_code: new.status_code,
            content_type: new.content_type,
            content_length: new.content_length,
            query_params: new.query_params,
            headers: new.headers,
            body: new.body,
            created_at,
        }
    }

    /// Project to the fields shown in listings.
    pub fn summary(&self) -> WebhookSummary {
        WebhookSummary {
            id: self.id,
            method: self.method.clone(),
            pathname: self.pathname.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing projection of a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSummary {
    pub id: WebhookId,
    pub method: String,
    pub pathname: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(query: Option<FlatMap>) -> Webhook {
        let new = NewWebhook {
            method: "POST".into(),
            pathname: "/orders".into(),
            ip: "unknown".into(),
            status_code: DEFAULT_STATUS_CODE,
            content_type: None,
            content_length: None,
            query_params: query,
            headers: FlatMap::new(),
            body: None,
        };
        Webhook::from_new(WebhookId::generate(), Utc::now(), new)
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let json = serde_json::to_value(sample(None)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("statusCode"));
        assert!(obj.contains_key("createdAt"));
        assert_eq!(obj["statusCode"], 200);
    }

    #[test]
    fn absent_query_params_are_omitted() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert!(!json.as_object().unwrap().contains_key("queryParams"));
        // Other optional fields stay present as null.
        assert!(json["body"].is_null());
        assert!(json["contentType"].is_null());
    }

    #[test]
    fn present_query_params_are_serialized() {
        let mut q = FlatMap::new();
        q.insert("x".into(), "".into());
        let json = serde_json::to_value(sample(Some(q))).unwrap();
        assert_eq!(json["queryParams"]["x"], "");
    }

    #[test]
    fn summary_keeps_identity_fields() {
        let wh = sample(None);
        let summary = wh.summary();
        assert_eq!(summary.id, wh.id);
        assert_eq!(summary.pathname, "/orders");
    }
}
