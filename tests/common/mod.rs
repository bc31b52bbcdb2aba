//! Shared utilities for integration and load testing.

use std::sync::Arc;
use tokio::net::TcpListener;

use inspector_sdk::InspectorClient;
use webhook_inspector::config::{InspectorConfig, StorageBackend};
use webhook_inspector::http::{AppState, HttpServer};
use webhook_inspector::lifecycle::Shutdown;
use webhook_inspector::store::{MemoryStore, WebhookStore};

/// A server running on an ephemeral port. Stops when dropped.
pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub store: Arc<dyn WebhookStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn client(&self) -> InspectorClient {
        InspectorClient::new(&self.url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server backed by a fresh in-memory store.
#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    start_server_with(Arc::new(MemoryStore::new())).await
}

/// Start a server over the given store, with generation disabled.
pub async fn start_server_with(store: Arc<dyn WebhookStore>) -> TestServer {
    let mut config = InspectorConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.backend = StorageBackend::Memory;
    config.generation.enabled = false;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let state = AppState::new(store.clone(), None, config.capture.clone());
    let server = HttpServer::new(config, state);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        url,
        store,
        shutdown,
    }
}
