//! In-process webhook store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

use crate::record::{NewWebhook, Webhook, WebhookId};
use crate::store::{DeleteOutcome, StoreResult, WebhookStore};

/// Webhook store backed by an ordered map.
///
/// Nothing survives a restart. Used for `storage.backend = "memory"` and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<WebhookId, Webhook>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: NewWebhook) -> StoreResult<WebhookId> {
        let mut records = self.records.write().await;
        // Generated under the write lock so map order matches insertion order.
        let id = WebhookId::generate();
        records.insert(id, Webhook::from_new(id, Utc::now(), record));
        Ok(id)
    }

    async fn get(&self, id: WebhookId) -> StoreResult<Option<Webhook>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: WebhookId) -> StoreResult<DeleteOutcome> {
        match self.records.write().await.remove(&id) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    async fn scan_ordered(
        &self,
        before: Option<WebhookId>,
        limit: usize,
    ) -> StoreResult<Vec<Webhook>> {
        let upper = match before {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };
        let records = self.records.read().await;
        Ok(records
            .range((Bound::Unbounded, upper))
            .rev()
            .take(limit)
            .map(|(_, w)| w.clone())
            .collect())
    }
}
