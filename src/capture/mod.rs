//! Request capture subsystem.
//!
//! # Data Flow
//! ```text
//! axum request (any verb on /capture/*path)
//!     → request.rs (HttpInbound: framework-free capability)
//!     → normalizer.rs (NewWebhook, graceful body fallback)
//!     → store.insert (assigns id + created_at)
//! ```

pub mod normalizer;
pub mod request;

pub use normalizer::{normalize, UNKNOWN_IP};
pub use request::{HttpInbound, InboundRequest};
