use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::types::{CaptureResponse, GenerateResponse, Status, Webhook, WebhookPage, WebhookSummary};

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook not found")]
    NotFound,

    #[error("inspector returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct InspectorClient {
    client: Client,
    base_url: String,
}

impl InspectorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send a request to be captured. `path_and_query` is relative to `/capture`.
    pub async fn capture(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &[(&str, &str)],
        body: impl Into<reqwest::Body>,
    ) -> Result<CaptureResponse, SdkError> {
        let path = path_and_query.trim_start_matches('/');
        let url = if path.is_empty() || path.starts_with('?') {
            format!("{}/capture{}", self.base_url, path)
        } else {
            format!("{}/capture/{}", self.base_url, path)
        };
        let mut req = self.client.request(method, url).body(body);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        decode(req.send().await?).await
    }

    /// One page of captured requests, newest first.
    pub async fn list(&self, limit: Option<usize>, cursor: Option<&str>) -> Result<WebhookPage, SdkError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        let resp = self
            .client
            .get(format!("{}/webhooks", self.base_url))
            .query(&query)
            .send()
            .await?;
        decode(resp).await
    }

    /// Follow cursors until the last page.
    pub async fn list_all(&self, page_size: usize) -> Result<Vec<WebhookSummary>, SdkError> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.list(Some(page_size), cursor.as_deref()).await?;
            all.extend(page.webhooks);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(all),
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Webhook, SdkError> {
        let resp = self
            .client
            .get(format!("{}/webhooks/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), SdkError> {
        let resp = self
            .client
            .delete(format!("{}/webhooks/{}", self.base_url, id))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    /// Ask the server to generate a handler from the given captures.
    pub async fn generate(&self, ids: &[&str]) -> Result<String, SdkError> {
        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&json!({ "webhookIds": ids }))
            .send()
            .await?;
        decode::<GenerateResponse>(resp).await.map(|r| r.code)
    }

    pub async fn status(&self) -> Result<Status, SdkError> {
        let resp = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn check(resp: Response) -> Result<Response, SdkError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SdkError::NotFound);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SdkError::Api { status, body });
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let text = check(resp).await?.text().await?;
    Ok(serde_json::from_str(&text)?)
}
