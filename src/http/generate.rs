//! Handler generation from captured payloads.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult, FieldError};
use crate::generation::{build_prompt, strip_code_fences};
use crate::http::server::AppState;
use crate::record::WebhookId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    webhook_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub code: String,
}

/// `POST /generate` with `{webhookIds: [...]}`.
pub async fn generate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let generator = state
        .generator
        .as_ref()
        .ok_or(ApiError::GenerationDisabled)?;

    let ids = parse_request(&body)?;

    let mut bodies = Vec::with_capacity(ids.len());
    for id in ids {
        let record = state
            .store
            .get(id)
            .await
            .map_err(ApiError::store("Failed to generate handler"))?;
        if let Some(body) = record.and_then(|w| w.body) {
            bodies.push(body);
        }
    }

    if bodies.is_empty() {
        tracing::warn!("No captured bodies for requested ids, generating without examples");
    }

    let prompt = build_prompt(&bodies);
    let text = generator
        .generate(&prompt)
        .await
        .map_err(|source| ApiError::Generation {
            context: "Failed to generate handler",
            source,
        })?;

    tracing::info!(examples = bodies.len(), "Handler generated");
    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            code: strip_code_fences(&text),
        }),
    ))
}

fn parse_request(body: &[u8]) -> ApiResult<Vec<WebhookId>> {
    let request: GenerateRequest = serde_json::from_slice(body).map_err(|e| {
        ApiError::validation(
            "Invalid request body",
            vec![FieldError::new("webhookIds", e.to_string())],
        )
    })?;

    if request.webhook_ids.is_empty() {
        return Err(ApiError::validation(
            "Invalid request body",
            vec![FieldError::new("webhookIds", "must contain at least one id")],
        ));
    }

    let mut ids = Vec::with_capacity(request.webhook_ids.len());
    let mut details = Vec::new();
    for (index, raw) in request.webhook_ids.iter().enumerate() {
        match raw.parse::<WebhookId>() {
            Ok(id) => ids.push(id),
            Err(e) => details.push(FieldError::new(format!("webhookIds[{index}]"), e.to_string())),
        }
    }

    if details.is_empty() {
        Ok(ids)
    } else {
        Err(ApiError::validation("Invalid request body", details))
    }
}
