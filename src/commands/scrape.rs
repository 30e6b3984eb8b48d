//! Scrape command implementation.

use crate::amazon::{BrowserClient, PageFetcher};
use crate::anti_detection::AntiDetection;
use crate::config::Config;
use crate::format::Formatter;
use crate::run::Orchestrator;
use crate::store::Store;
use anyhow::{Context, Result};
use tracing::info;

/// Executes a full category scrape run.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes the category, persists results, and returns formatted output.
    pub async fn execute(&self, category_url: &str) -> Result<String> {
        let client =
            BrowserClient::new(&self.config).context("Failed to create HTTP client")?;

        let store = Store::connect(&self.config.database_url)
            .await
            .context("Failed to open product store")?;

        self.execute_with(&client, &store, category_url).await
    }

    /// Executes the scrape with a provided client and store (for testing).
    pub async fn execute_with(
        &self,
        client: &dyn PageFetcher,
        store: &Store,
        category_url: &str,
    ) -> Result<String> {
        let anti = AntiDetection::new(self.config.pace_min_ms, self.config.pace_max_ms);
        let base_url = base_url_of(category_url);

        let orchestrator = Orchestrator::new(client, &anti, store, base_url, &self.config);
        let summary = orchestrator.run(category_url).await?;

        info!(
            "Run complete: {} persisted, {} skipped",
            summary.persisted, summary.skipped
        );

        let products = store.get_all().await.context("Failed to read back products")?;
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_summary(&summary, &products))
    }
}

/// Extracts the scheme and host from a category URL, for resolving
/// relative detail links.
fn base_url_of(category_url: &str) -> String {
    if let Some(scheme_end) = category_url.find("://") {
        let rest = &category_url[scheme_end + 3..];
        let host_end = rest.find('/').map(|i| scheme_end + 3 + i).unwrap_or(category_url.len());
        category_url[..host_end].to_string()
    } else {
        "https://www.amazon.com".to_string()
    }
}
