//! Keyset pagination over the webhook store.
//!
//! The cursor is the id of the last record on the previous page. The next
//! page holds records with ids strictly below it. One extra record is
//! fetched to learn whether another page exists without a count query.

use crate::error::FieldError;
use crate::record::{Webhook, WebhookId};
use crate::store::{StoreResult, WebhookStore};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// A validated listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub cursor: Option<WebhookId>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            cursor: None,
        }
    }
}

impl PageRequest {
    /// Validate raw `limit` and `cursor` query values.
    ///
    /// Missing or empty values take their defaults. Every invalid field is
    /// reported.
    pub fn parse(limit: Option<&str>, cursor: Option<&str>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let limit = match limit.map(str::trim).filter(|s| !s.is_empty()) {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
                _ => {
                    errors.push(FieldError::new(
                        "limit",
                        format!("must be an integer between 1 and {MAX_LIMIT}"),
                    ));
                    DEFAULT_LIMIT
                }
            },
        };

        let cursor = match cursor.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<WebhookId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    errors.push(FieldError::new("cursor", e.to_string()));
                    None
                }
            },
        };

        if errors.is_empty() {
            Ok(Self { limit, cursor })
        } else {
            Err(errors)
        }
    }
}

/// One page of records, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Webhook>,
    pub next_cursor: Option<WebhookId>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Fetch one page, over-fetching by one record.
pub async fn fetch_page(store: &dyn WebhookStore, request: &PageRequest) -> StoreResult<Page> {
    let mut items = store
        .scan_ordered(request.cursor, request.limit + 1)
        .await?;

    let next_cursor = if items.len() > request.limit {
        items.truncate(request.limit);
        items.last().map(|w| w.id)
    } else {
        None
    };

    Ok(Page { items, next_cursor })
}
