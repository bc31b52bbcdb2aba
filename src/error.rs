//! API error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, ApiError>`; nothing else crosses the
//! HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::store::StoreError;

/// One invalid input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input. Never logged as a server fault.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Webhook not found.")]
    NotFound,

    /// The store failed. Only `context` reaches the client.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{context}: {source}")]
    Generation {
        context: &'static str,
        #[source]
        source: GenerationError,
    },

    #[error("Code generation is disabled")]
    GenerationDisabled,
}

impl ApiError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Attach a client-safe context to a store failure.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::Generation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GenerationDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation { message, details } => {
                tracing::debug!(error = %message, details = details.len(), "Rejected request");
                json!({ "error": message, "details": details })
            }
            Self::NotFound => json!({ "message": "Webhook not found." }),
            Self::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                json!({ "error": context })
            }
            Self::Generation { context, source } => {
                tracing::error!(error = %source, "{}", context);
                json!({ "error": context })
            }
            Self::GenerationDisabled => {
                json!({ "error": "Code generation is disabled" })
            }
        };
        (status, Json(body)).into_response()
    }
}
