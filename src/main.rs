//! fanout-edge
//!
//! Routes requests in front of the Fanout realtime proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing ──┬─▶ Local:   handlers (test, bayeux)
//!                    (request id,    (host,     │
//!                     tracing)       path,      └─▶ Forward: forwarder ──▶ {scheme}_backend_{host}
//!                                    scheme)                 (registry,       origin
//!                                                             X-Forwarded-*)
//!
//!     Cross-cutting: config (load, validate, watch) · observability · lifecycle
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use fanout_edge::config::{load_config, ConfigWatcher, EdgeConfig};
use fanout_edge::http::HttpServer;
use fanout_edge::lifecycle::Shutdown;
use fanout_edge::observability::{logging, metrics};
use fanout_edge::routing::{RequestRouter, RequestTarget};

#[derive(Parser)]
#[command(name = "fanout-edge")]
#[command(about = "Edge routing layer in front of the Fanout proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve HTTP traffic (default)
    Serve,
    /// Print the routing decision for a request as JSON
    Route {
        #[arg(long)]
        host: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Scheme reported for the request; defaults to routing.default_scheme
        #[arg(long)]
        scheme: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.config).await,
        Commands::Route { host, path, scheme } => {
            let router = RequestRouter::new(config.routing.fanout_domain_suffix.clone());
            let scheme = scheme.unwrap_or(config.routing.default_scheme);
            let decision = router.route(&RequestTarget::new(&host, &path, &scheme));
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(())
        }
    }
}

async fn serve(config: EdgeConfig, config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&config.observability);

    tracing::info!("fanout-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
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

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, backend_updates) = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path, config.clone());
            (Some(watcher.run()?), updates)
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    HttpServer::new(config)
        .run(listener, backend_updates, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
