//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database location
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Lower bound of the pacing window before each navigation
    #[serde(default = "default_pace_min_ms")]
    pub pace_min_ms: u64,

    /// Upper bound of the pacing window
    #[serde(default = "default_pace_max_ms")]
    pub pace_max_ms: u64,

    /// Page-load timeout before a retry is triggered
    #[serde(default = "default_nav_timeout_secs")]
    pub nav_timeout_secs: u64,

    /// Bounded retry budget per navigation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff before the first retry; doubles per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// How many ranked candidates to take from the listing
    #[serde(default = "default_max_products")]
    pub max_products: usize,

    /// Whether to publish a public tunnel URL for the read API. Accepted for
    /// compatibility; this build only logs it.
    #[serde(default)]
    pub enable_tunnel: bool,

    /// Read API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Output format for CLI results
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_database_url() -> String {
    "sqlite:amazon_products.db".to_string()
}

fn default_pace_min_ms() -> u64 {
    3000
}

fn default_pace_max_ms() -> u64 {
    5000
}

fn default_nav_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_max_products() -> usize {
    5
}

fn default_port() -> u16 {
    10000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            proxy: None,
            pace_min_ms: default_pace_min_ms(),
            pace_max_ms: default_pace_max_ms(),
            nav_timeout_secs: default_nav_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_products: default_max_products(),
            enable_tunnel: false,
            port: default_port(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-bestsellers").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(db) = std::env::var("AMZ_DB") {
            self.database_url = db;
        }

        if let Ok(proxy) = std::env::var("AMZ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(port) = std::env::var("AMZ_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        self
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: table, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
