//! NetWith Discovery (netwith-ds) - Main entry point
//!
//! Serves swipe-based discovery over a pool of professional profiles:
//! shuffled candidate decks per viewer, swipe recording with mutual-match
//! detection, and an SSE stream of discovery activity.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use netwith_common::events::EventBus;
use netwith_ds::config::{LoggingConfig, RuntimeSettings, TomlConfig};
use netwith_ds::{build_router, AppState};

/// Command-line arguments for netwith-ds
#[derive(Parser, Debug)]
#[command(name = "netwith-ds")]
#[command(about = "Discovery microservice for NetWith")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "NETWITH_DS_PORT")]
    port: Option<u16>,

    /// Root folder containing the database
    #[arg(short, long, env = "NETWITH_ROOT_FOLDER")]
    root_folder: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Bootstrap config is read before tracing init so the log level and
    // log file can come from it
    let toml_config = match &args.config {
        Some(path) => TomlConfig::load(path).await?,
        None => TomlConfig::default(),
    };

    init_tracing(&toml_config.logging)?;

    // Log build identification immediately after tracing init
    info!(
        "Starting NetWith Discovery (netwith-ds) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Root folder: CLI/env argument, then config file, then resolver
    // fallthrough (default config location, OS default)
    let root_folder = match args
        .root_folder
        .map(PathBuf::from)
        .or_else(|| toml_config.root_folder.clone())
    {
        Some(path) => path,
        None => netwith_common::config::resolve_root_folder(
            None,
            "NETWITH_ROOT_FOLDER",
            Some("root_folder"),
        )?,
    };
    info!("Root folder: {}", root_folder.display());

    let db_path = root_folder.join("netwith.db");
    let db = netwith_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready: {}", db_path.display());

    let runtime = RuntimeSettings::load(&db).await?;
    let event_bus = EventBus::new(runtime.event_bus_capacity);

    let state = AppState::new(db, event_bus, runtime.exhaustion_policy);
    let app = build_router(state);

    let port = args.port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("netwith-ds listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber
///
/// RUST_LOG overrides the configured level. With a log file configured,
/// output goes there instead of stderr.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
