//! SQLite webhook store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;
use tokio_rusqlite::Connection;

use crate::observability::metrics;
use crate::record::{FlatMap, InvalidId, NewWebhook, Webhook, WebhookId};
use crate::store::schema::{init_schema, RECORD_COLUMNS};
use crate::store::{DeleteOutcome, StoreError, StoreResult, WebhookStore};

/// Embedded relational store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::with_schema(conn).await
    }

    /// Open (or create) a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", path.display(), e)))?;
        Self::with_schema(conn).await
    }

    async fn with_schema(conn: Connection) -> StoreResult<Self> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(Self { conn })
    }
}

/// A row as SQLite hands it back, before JSON and id decoding.
struct RawRow {
    id: String,
    method: String,
    pathname: String,
    ip: String,
    status_code: i64,
    content_type: Option<String>,
    content_length: Option<i64>,
    query_params: Option<String>,
    headers: String,
    body: Option<String>,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            method: row.get(1)?,
            pathname: row.get(2)?,
            ip: row.get(3)?,
            status_code: row.get(4)?,
            content_type: row.get(5)?,
            content_length: row.get(6)?,
            query_params: row.get(7)?,
            headers: row.get(8)?,
            body: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn decode(self) -> StoreResult<Webhook> {
        let corrupt = |reason: String| StoreError::Corrupt {
            id: self.id.clone(),
            reason,
        };

        let id: WebhookId = self
            .id
            .parse()
            .map_err(|e: InvalidId| corrupt(e.to_string()))?;
        let status_code = u16::try_from(self.status_code)
            .map_err(|_| corrupt(format!("status code {} out of range", self.status_code)))?;
        let headers: FlatMap = serde_json::from_str(&self.headers)
            .map_err(|e| corrupt(format!("headers: {e}")))?;
        let query_params = match &self.query_params {
            Some(text) => Some(
                serde_json::from_str::<FlatMap>(text)
                    .map_err(|e| corrupt(format!("query_params: {e}")))?,
            ),
            None => None,
        };
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| corrupt(format!("created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Webhook {
            id,
            method: self.method,
            pathname: self.pathname,
            ip: self.ip,
            status_code,
            content_type: self.content_type,
            content_length: self.content_length,
            query_params,
            headers,
            body: self.body,
            created_at,
        })
    }
}

fn query_error(operation: &'static str, e: tokio_rusqlite::Error) -> StoreError {
    metrics::record_store_error(operation);
    StoreError::Query(format!("{operation}: {e}"))
}

#[async_trait]
impl WebhookStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, record: NewWebhook) -> StoreResult<WebhookId> {
        let headers = serde_json::to_string(&record.headers)
            .map_err(|e| StoreError::Query(format!("encode headers: {e}")))?;
        let query_params = record
            .query_params
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Query(format!("encode query params: {e}")))?;

        self.conn
            .call(move |conn| {
                // Generated on the connection thread so row order follows id order.
                let id = WebhookId::generate();
                let created_at = Utc::now().to_rfc3339();
                conn.execute(
                    "INSERT INTO webhooks (id, method, pathname, ip, status_code, content_type,
                     content_length, query_params, headers, body, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        id.to_string(),
                        record.method,
                        record.pathname,
                        record.ip,
                        record.status_code,
                        record.content_type,
                        record.content_length,
                        query_params,
                        headers,
                        record.body,
                        created_at,
                    ],
                )?;
                Ok(id)
            })
            .await
            .map_err(|e| query_error("insert", e))
    }

    async fn get(&self, id: WebhookId) -> StoreResult<Option<Webhook>> {
        let key = id.to_string();
        let raw = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {RECORD_COLUMNS} FROM webhooks WHERE id = ?1");
                let row = conn
                    .query_row(&sql, [&key], RawRow::from_row)
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(|e| query_error("get", e))?;

        raw.map(RawRow::decode).transpose()
    }

    async fn delete(&self, id: WebhookId) -> StoreResult<DeleteOutcome> {
        let key = id.to_string();
        let removed = self
            .conn
            .call(move |conn| Ok(conn.execute("DELETE FROM webhooks WHERE id = ?1", [&key])?))
            .await
            .map_err(|e| query_error("delete", e))?;

        Ok(if removed == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }

    async fn scan_ordered(
        &self,
        before: Option<WebhookId>,
        limit: usize,
    ) -> StoreResult<Vec<Webhook>> {
        let cursor = before.map(|id| id.to_string());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {RECORD_COLUMNS} FROM webhooks
                     WHERE ?1 IS NULL OR id < ?1
                     ORDER BY id DESC
                     LIMIT ?2"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![cursor, limit], RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| query_error("scan", e))?;

        rows.into_iter().map(RawRow::decode).collect()
    }
}
