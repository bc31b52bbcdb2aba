//! Webhook Inspector
//!
//! A disposable request bin: every request sent to `/capture/...` is stored
//! and can be listed, inspected and deleted over a small JSON API.
//!
//! # Architecture Overview
//!
//! ```text
//!   any client ──► /capture/{*path} ──► normalizer ──► store.insert ──► 201 {id}
//!
//!   developer  ──► /webhooks          ──► keyset page over store.scan_ordered
//!              ──► /webhooks/{id}     ──► store.get / store.delete
//!              ──► /generate          ──► stored bodies ──► text generator
//!
//!   store: SQLite file (default) or in-process map
//! ```

use clap::Parser;
use std::path::PathBuf;

use webhook_inspector::config::load_or_default;
use webhook_inspector::lifecycle::{startup, Shutdown};
use webhook_inspector::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "webhook-inspector")]
#[command(about = "Capture and inspect arbitrary HTTP requests", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "INSPECTOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("webhook-inspector v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = ?config.storage.backend,
        request_timeout_secs = config.timeouts.request_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "Inspector failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
