//! Site front controller.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  SITE ROUTER                     │
//!                        │                                                  │
//!   Client Request       │  ┌─────────┐    ┌──────────────┐                 │
//!   ─────────────────────┼─▶│  http   │───▶│   routing    │                 │
//!                        │  │ server  │    │   router     │                 │
//!                        │  └─────────┘    └──────┬───────┘                 │
//!                        │                        │                         │
//!                        │        ┌───────────────┼────────────────┐        │
//!                        │        ▼               ▼                ▼        │
//!                        │  ┌───────────┐  ┌─────────────┐  ┌────────────┐  │
//!                        │  │  locale   │  │ page render │  │  services  │  │
//!                        │  │negotiation│  │  handoff    │  │  registry  │  │
//!                        │  └───────────┘  └─────────────┘  └────────────┘  │
//!                        │                                                  │
//!                        │  config · observability · lifecycle              │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use site_router::config::watcher::ConfigWatcher;
use site_router::lifecycle::{signals, startup};
use site_router::observability::{logging, metrics};
use site_router::{HttpServer, Shutdown, SiteState};

#[derive(Parser)]
#[command(name = "site-router")]
#[command(about = "Locale-aware front controller for the marketing site", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not reload when the configuration file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load_or_default(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("site-router v{} starting", env!("CARGO_PKG_VERSION"));

    let site = SiteState::build(config)?;
    tracing::info!(
        bind_address = %site.config.listener.bind_address,
        routes = site.router.table().len(),
        locales = site.router.catalog().len(),
        multi_locale = site.config.locales.multi_locale,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&site.config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if site.config.observability.metrics_enabled {
        match site.config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %site.config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (_watcher, updates) = match (&args.config, args.no_watch) {
        (Some(path), false) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(site);
    server.run(listener, updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
