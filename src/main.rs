//! API router service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      API ROUTER                       │
//!                 │                                                       │
//!  config.toml ───┼─▶ config ──▶ features ──┐                             │
//!       │         │                         ▼                             │
//!       │         │   catalog (route groups, gates) ──▶ routing::Router   │
//!       │         │                                         │             │
//!       │         │                    ┌────────────────────┼──────────┐  │
//!       │         │                    ▼                    ▼          ▼  │
//!       │         │              resolve(path)       reverse(name)  schema│
//!       │         │                    │                    │          │  │
//!  Request ──────▶│ http server ───────┴──── /_router control API ─────┘  │
//!       │         │                                                       │
//!  watcher ───────┼─▶ rebuild table ──▶ ArcSwap (hot swap)                │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use api_router::config::{load_config, ConfigWatcher, RouterConfig};
use api_router::lifecycle::{self, signals, Shutdown};
use api_router::observability::{logging, metrics};
use api_router::schema::SchemaExporter;
use api_router::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "api-router")]
#[command(about = "Hierarchical API request router", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the schema of the assembled table and exit
    #[arg(long)]
    export_schema: bool,

    /// Build the route table, report, and exit
    #[arg(long)]
    check: bool,

    /// Do not watch the configuration file for changes
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-router starting");

    let router = lifecycle::assemble(&config)?;

    if args.check {
        println!(
            "route table ok: {} entries, {} groups excluded",
            router.len(),
            router.excluded_groups()
        );
        return Ok(());
    }

    if args.export_schema {
        let document = SchemaExporter::export(&router);
        println!("{}", SchemaExporter::to_json(&document)?);
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    signals::forward_signals(shutdown.clone());
    let shutdown_rx = shutdown.subscribe();

    // Watcher handle must outlive the server.
    let (_watcher, config_updates, _reload_tx) = match &args.config {
        Some(path) if !args.no_watch => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx, None)
        }
        _ => {
            let (tx, rx) = mpsc::unbounded_channel();
            (None, rx, Some(tx))
        }
    };

    let server = HttpServer::new(config, router)?;
    server.run(listener, config_updates, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
