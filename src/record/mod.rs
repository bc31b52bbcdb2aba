//! Webhook record model.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → capture::normalize (NewWebhook, no id yet)
//!     → store.insert (WebhookId::generate + created_at)
//!     → Webhook (immutable until deleted)
//! ```

pub mod id;
pub mod types;

pub use id::{InvalidId, WebhookId};
pub use types::{FlatMap, NewWebhook, Webhook, WebhookSummary, DEFAULT_STATUS_CODE};
