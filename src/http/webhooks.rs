//! Listing, detail and delete endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult, FieldError};
use crate::http::server::AppState;
use crate::pagination::{fetch_page, PageRequest};
use crate::record::{Webhook, WebhookId, WebhookSummary};
use crate::store::DeleteOutcome;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub webhooks: Vec<WebhookSummary>,
    pub next_cursor: Option<WebhookId>,
}

/// `GET /webhooks?limit=&cursor=`
pub async fn list_webhooks(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<ListResponse>> {
    let (limit, cursor) = list_params(query.as_deref());
    let request = PageRequest::parse(limit.as_deref(), cursor.as_deref())
        .map_err(|details| ApiError::validation("Invalid query parameters", details))?;

    let page = fetch_page(state.store.as_ref(), &request)
        .await
        .map_err(ApiError::store("Failed to list webhooks"))?;

    Ok(Json(ListResponse {
        webhooks: page.items.iter().map(Webhook::summary).collect(),
        next_cursor: page.next_cursor,
    }))
}

/// `GET /webhooks/{id}`
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Webhook>> {
    let id = parse_id(&id)?;
    match state
        .store
        .get(id)
        .await
        .map_err(ApiError::store("Failed to fetch webhook"))?
    {
        Some(webhook) => Ok(Json(webhook)),
        None => Err(ApiError::NotFound),
    }
}

/// `DELETE /webhooks/{id}`
pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    match state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store("Failed to delete webhook"))?
    {
        DeleteOutcome::Deleted => {
            tracing::info!(id = %id, "Webhook deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(ApiError::NotFound),
    }
}

fn parse_id(raw: &str) -> ApiResult<WebhookId> {
    raw.parse().map_err(|e: crate::record::InvalidId| {
        ApiError::validation(
            "Invalid webhook ID",
            vec![FieldError::new("id", e.to_string())],
        )
    })
}

/// Last `limit` and `cursor` values from a raw query string.
fn list_params(query: Option<&str>) -> (Option<String>, Option<String>) {
    let mut limit = None;
    let mut cursor = None;
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "limit" => limit = Some(value.into_owned()),
            "cursor" => cursor = Some(value.into_owned()),
            _ => {}
        }
    }
    (limit, cursor)
}
