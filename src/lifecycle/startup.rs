//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the configured store
//! - Build the optional text generator
//! - Bind the listener (plain or TLS) and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{GenerationConfig, InspectorConfig, StorageBackend, StorageConfig};
use crate::generation::{GeminiGenerator, GenerationError, TextGenerator};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::net::tls::load_tls_config;
use crate::store::{MemoryStore, SqliteStore, StoreError, WebhookStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build text generator: {0}")]
    Generation(#[from] GenerationError),

    #[error("invalid bind address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("TLS setup failed: {0}")]
    Tls(#[source] std::io::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the backend named in config.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn WebhookStore>, StoreError> {
    let store: Arc<dyn WebhookStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&config.path).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!(backend = store.backend(), path = %config.path, "Store ready");
    Ok(store)
}

/// Build the text generator, or `None` when generation is unavailable.
pub fn build_generator(
    config: &GenerationConfig,
) -> Result<Option<Arc<dyn TextGenerator>>, GenerationError> {
    Ok(GeminiGenerator::from_env(config)?.map(|g| {
        tracing::info!(model = %config.model, "Text generation enabled");
        Arc::new(g) as Arc<dyn TextGenerator>
    }))
}

/// Assemble handler state from config.
pub async fn build_state(config: &InspectorConfig) -> Result<AppState, StartupError> {
    let store = open_store(&config.storage).await?;
    let generator = build_generator(&config.generation)?;
    Ok(AppState::new(store, generator, config.capture.clone()))
}

/// Start every subsystem and serve until shutdown.
pub async fn run(config: InspectorConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let state = build_state(&config).await?;
    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, state);

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse().map_err(|source| StartupError::Address {
                address: bind_address.clone(),
                source,
            })?;
            let rustls = load_tls_config(&tls).await.map_err(StartupError::Tls)?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    Ok(())
}
