//! Configuration for the discovery service
//!
//! Two tiers:
//! 1. TOML bootstrap: port, root folder, logging. Read once at startup.
//! 2. Database runtime: discovery behavior from the `settings` table.
//!
//! Priority for any one value: command-line argument, then environment
//! variable, then TOML file, then built-in default.

use crate::db::settings;
use crate::discovery::ExhaustionPolicy;
use netwith_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// Bootstrap configuration loaded from a TOML file
///
/// These settings cannot change during runtime; restart to pick up edits.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root folder holding the database file (optional)
    ///
    /// If not specified, resolution falls through environment variable and
    /// OS default.
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: TomlConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_folder: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    ///
    /// The RUST_LOG environment variable overrides this.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_port() -> u16 {
    5730
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Runtime settings loaded from the database
///
/// Missing or unreadable values fall back to built-in defaults; they do
/// not block startup.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Session behavior when a deck is exhausted
    pub exhaustion_policy: ExhaustionPolicy,

    /// Broadcast channel capacity for the event bus
    pub event_bus_capacity: usize,
}

impl RuntimeSettings {
    /// Load runtime settings from the settings table
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let exhaustion_policy = settings::load_exhaustion_policy(pool).await?;
        let event_bus_capacity = settings::load_event_bus_capacity(pool).await?;

        info!(
            "Runtime settings: exhaustion_policy={}, event_bus_capacity={}",
            exhaustion_policy, event_bus_capacity
        );

        Ok(Self {
            exhaustion_policy,
            event_bus_capacity,
        })
    }
}
