//! Database schema management.

use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- Captured requests. The UUIDv7 primary key is also the sort key.
CREATE TABLE IF NOT EXISTS webhooks (
    id TEXT PRIMARY KEY NOT NULL,
    method TEXT NOT NULL,
    pathname TEXT NOT NULL,
    ip TEXT NOT NULL,
    status_code INTEGER NOT NULL DEFAULT 200,
    content_type TEXT,
    content_length INTEGER,
    query_params TEXT,
    headers TEXT NOT NULL,
    body TEXT,
    created_at TEXT NOT NULL
);
"#;

/// Columns selected for a full record, in decode order.
pub const RECORD_COLUMNS: &str = "id, method, pathname, ip, status_code, content_type, \
     content_length, query_params, headers, body, created_at";
