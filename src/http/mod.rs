//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware/ (per-route metrics)
//!     → capture.rs   /capture/{*path}   → normalizer → store.insert
//!     → webhooks.rs  /webhooks[/{id}]   → pagination / store.get / store.delete
//!     → generate.rs  /generate          → store.get → text generator
//!     → status.rs    /status
//! ```
//!
//! Handlers return `Result<_, ApiError>`; the mapping to status codes lives
//! in `crate::error`.

pub mod capture;
pub mod generate;
pub mod middleware;
pub mod server;
pub mod status;
pub mod webhooks;

pub use server::{AppState, HttpServer};
