//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, limits, metrics)
//! - Bind server to a plain or TLS listener
//! - Stop on OS signal or coordinator broadcast

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, on, post, MethodFilter},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CaptureConfig, InspectorConfig};
use crate::generation::TextGenerator;
use crate::http::middleware::track_metrics;
use crate::http::{capture, generate, status, webhooks};
use crate::lifecycle::signals;
use crate::store::WebhookStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WebhookStore>,
    /// `None` when code generation is disabled.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub capture: Arc<CaptureConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WebhookStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        capture: CaptureConfig,
    ) -> Self {
        Self {
            store,
            generator,
            capture: Arc::new(capture),
        }
    }
}

/// HTTP server for the inspector.
pub struct HttpServer {
    router: Router,
    config: InspectorConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: InspectorConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &InspectorConfig, state: AppState) -> Router {
        let capture_verbs = MethodFilter::GET
            .or(MethodFilter::POST)
            .or(MethodFilter::PUT)
            .or(MethodFilter::PATCH)
            .or(MethodFilter::DELETE);

        // Capture bodies are bounded inside the handler, where an oversized
        // body still yields a record.
        let capture_routes = Router::new()
            .route("/capture", on(capture_verbs, capture::capture_request))
            .route("/capture/", on(capture_verbs, capture::capture_request))
            .route("/capture/{*path}", on(capture_verbs, capture::capture_request));

        let api_routes = Router::new()
            .route("/webhooks", get(webhooks::list_webhooks))
            .route(
                "/webhooks/{id}",
                get(webhooks::get_webhook).delete(webhooks::delete_webhook),
            )
            .route("/generate", post(generate::generate_handler))
            .route("/status", get(status::get_status))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        Router::new()
            .merge(capture_routes)
            .merge(api_routes)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            let request_id = request
                                .headers()
                                .get("x-request-id")
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("-");
                            tracing::info_span!(
                                "http",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request_id,
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = signals::wait_for_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        let grace = Duration::from_secs(self.config.timeouts.request_secs);
        tokio::spawn(async move {
            tokio::select! {
                _ = signals::wait_for_signal() => {}
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested");
                }
            }
            drain.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
