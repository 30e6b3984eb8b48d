//! Serve command implementation.

use crate::api;
use crate::config::Config;
use crate::store::Store;
use anyhow::{Context, Result};
use tracing::info;

/// Runs the read-only HTTP API over the product store.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    /// Creates a new serve command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Opens the store and serves until interrupted.
    pub async fn execute(&self) -> Result<()> {
        let store = Store::connect(&self.config.database_url)
            .await
            .context("Failed to open product store")?;

        info!("Serving product API on port {}", self.config.port);
        api::serve(store, self.config.port, self.config.enable_tunnel)
            .await
            .context("API server failed")
    }
}
