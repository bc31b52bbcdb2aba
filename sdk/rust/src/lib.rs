//! HTTP client for a running webhook inspector.

mod client;
mod types;

pub use client::{InspectorClient, SdkError};
pub use types::{CaptureResponse, GenerateResponse, Status, Webhook, WebhookPage, WebhookSummary};
