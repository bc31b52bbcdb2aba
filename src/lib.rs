//! Webhook Inspector Library
//!
//! Captures arbitrary HTTP requests as immutable records and serves them back
//! for inspection.

pub mod capture;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pagination;
pub mod record;
pub mod store;

pub use config::InspectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
