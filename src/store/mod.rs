//! Webhook persistence subsystem.
//!
//! # Data Flow
//! ```text
//! capture handler  → insert(NewWebhook)            → WebhookId
//! detail handler   → get(id)                       → Option<Webhook>
//! delete handler   → delete(id)                    → DeleteOutcome
//! listing handler  → scan_ordered(before, limit)   → Vec<Webhook>, newest first
//! ```
//!
//! # Design Decisions
//! - The identifier is the only ordering; no secondary sort key
//! - Keyset exclusion (`id < before`), never offsets
//! - Records are immutable; there is no update operation
//! - Concurrency control is the backend's job (single-row atomic ops)

pub mod memory;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::record::{NewWebhook, Webhook, WebhookId};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be opened or reached.
    #[error("store connection error: {0}")]
    Connection(String),

    /// A statement failed.
    #[error("store query error: {0}")]
    Query(String),

    /// A stored row could not be decoded back into a record.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Persistence contract for captured webhooks.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Short backend name for logs and status output.
    fn backend(&self) -> &'static str;

    /// Persist a record under a freshly generated id and return that id.
    ///
    /// Once this returns, `get` with the id succeeds until the record is deleted.
    async fn insert(&self, record: NewWebhook) -> StoreResult<WebhookId>;

    /// Fetch one record.
    async fn get(&self, id: WebhookId) -> StoreResult<Option<Webhook>>;

    /// Remove one record.
    async fn delete(&self, id: WebhookId) -> StoreResult<DeleteOutcome>;

    /// Records in descending id order, limited to ids strictly below `before`
    /// when given.
    async fn scan_ordered(
        &self,
        before: Option<WebhookId>,
        limit: usize,
    ) -> StoreResult<Vec<Webhook>>;
}
