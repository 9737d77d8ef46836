//! boards-bridge
//!
//! Runs the host side of the boards app outside the host server: loads a
//! host configuration snapshot, translates it and serves the boards app
//! behind the plugin prefix.
//!
//! ```text
//!  host config file ──▶ loader ──▶ translate ──▶ BoardsConfig ──▶ boards app
//!        │                                                          ▲
//!        └── watcher (--watch) ── reload ──────────────────────────┘
//!
//!  client ──▶ axum (/plugins/focalboard) ──▶ RequestDelegate ──▶ boards app router
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use boards_bridge::boards::TranslateParams;
use boards_bridge::bridge::BoardsBridge;
use boards_bridge::config::{load_host_config, HostConfigWatcher};
use boards_bridge::http::HttpServer;
use boards_bridge::lifecycle::{signals, Shutdown};
use boards_bridge::observability::{logging, metrics};
use boards_bridge::status::{redact, StatusApp};

#[derive(Parser)]
#[command(name = "boards-bridge")]
#[command(about = "Host-side adapter for the embedded boards app", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the boards config derived from a host config file
    Translate {
        #[command(flatten)]
        source: SourceArgs,

        /// Print secrets instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Serve the boards app behind the plugin prefix
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, default_value = "127.0.0.1:8065")]
        bind: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        request_timeout: u64,

        /// Reload the host config when the file changes
        #[arg(long)]
        watch: bool,

        /// Expose Prometheus metrics on this address
        #[arg(long)]
        metrics_address: Option<String>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Host config file (TOML, or JSON when ending in .json)
    #[arg(short, long)]
    config: PathBuf,

    /// Replaces the host's file storage directory
    #[arg(long, default_value = "")]
    override_dir: String,

    #[arg(long, default_value = "")]
    telemetry_id: String,
}

impl SourceArgs {
    fn params(&self) -> TranslateParams {
        TranslateParams {
            override_directory: self.override_dir.clone(),
            telemetry_id: self.telemetry_id.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Translate {
            source,
            show_secrets,
        } => {
            let host = load_host_config(&source.config)?;
            let config = source.params().translate(&host);
            let config = if show_secrets { config } else { redact(&config) };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Serve {
            source,
            bind,
            request_timeout,
            watch,
            metrics_address,
        } => {
            if let Some(addr) = metrics_address {
                metrics::init_metrics(addr.parse::<SocketAddr>()?)?;
            }
            serve(source, &bind, Duration::from_secs(request_timeout), watch).await?;
        }
    }

    Ok(())
}

async fn serve(
    source: SourceArgs,
    bind: &str,
    request_timeout: Duration,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("boards-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    let host = load_host_config(&source.config)?;
    tracing::info!(path = ?source.config, "Host configuration loaded");

    let bridge = Arc::new(BoardsBridge::new(
        &host,
        source.params(),
        Arc::new(StatusApp::new()),
    ));

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    // The watcher handle must outlive the reload loop.
    let (_watcher, updates) = if watch {
        let (watcher, updates) = HostConfigWatcher::new(&source.config);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let reload_bridge = Arc::clone(&bridge);
    let reload_shutdown = shutdown.subscribe();
    let reload = tokio::spawn(async move {
        reload_bridge.run_reload_loop(updates, reload_shutdown).await;
    });

    let listener = TcpListener::bind(bind).await?;
    let server = HttpServer::new(bridge.delegate(), request_timeout);
    server.run(listener, shutdown.subscribe()).await?;

    shutdown.trigger();
    let _ = reload.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
