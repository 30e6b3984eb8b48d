//! Run orchestration: listing -> candidates -> per-candidate extraction ->
//! persistence, strictly sequential on one browsing client.

use crate::amazon::client::{fetch_with_retries, PageFetcher};
use crate::amazon::extract::{detect_page_errors, ProductExtractor};
use crate::amazon::listing::extract_candidates;
use crate::amazon::models::RunSummary;
use crate::anti_detection::AntiDetection;
use crate::config::Config;
use crate::error::ScrapeError;
use crate::store::Store;
use scraper::Html;
use std::time::Duration;
use tracing::{error, info, warn};

/// Drives one end-to-end scrape run.
///
/// Owns the retry/skip policy and the run-level success criterion: at least
/// one product persisted. The browsing client is exclusively ours for the
/// duration of the run.
pub struct Orchestrator<'a> {
    client: &'a dyn PageFetcher,
    anti: &'a AntiDetection,
    store: &'a Store,
    base_url: String,
    max_products: usize,
    max_retries: u32,
    backoff_base: Duration,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        client: &'a dyn PageFetcher,
        anti: &'a AntiDetection,
        store: &'a Store,
        base_url: impl Into<String>,
        config: &Config,
    ) -> Self {
        Self {
            client,
            anti,
            store,
            base_url: base_url.into(),
            max_products: config.max_products,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Runs the full pipeline against one category listing URL.
    pub async fn run(&self, category_url: &str) -> Result<RunSummary, ScrapeError> {
        info!("Loading category listing: {}", category_url);

        self.client.set_identity(self.anti.next_identity());

        let listing_html =
            fetch_with_retries(self.client, category_url, self.max_retries, self.backoff_base)
                .await
                .map_err(|source| ScrapeError::ListingUnreachable {
                    attempts: self.max_retries + 1,
                    source,
                })?;

        detect_page_errors(&Html::parse_document(&listing_html)).map_err(|source| {
            ScrapeError::ListingUnreachable { attempts: self.max_retries + 1, source }
        })?;

        let candidates = extract_candidates(&listing_html, &self.base_url, self.max_products)?;
        info!("Collected {} candidates to process", candidates.len());

        let mut summary = RunSummary {
            requested: self.max_products,
            found: candidates.len(),
            ..Default::default()
        };

        let extractor = ProductExtractor::new(self.client, self.max_retries, self.backoff_base);

        for candidate in &candidates {
            self.anti.pace_and_simulate(self.client).await;
            self.client.set_identity(self.anti.next_identity());

            let product = match extractor.extract(candidate).await {
                Ok(product) => product,
                Err(e) => {
                    warn!(asin = %candidate.asin, rank = candidate.rank, "skipping candidate: {e}");
                    summary.skipped += 1;
                    continue;
                }
            };

            summary.extracted += 1;
            info!(
                asin = %product.asin,
                rank = product.rank,
                price = product.price,
                "extracted product"
            );

            match self.store.upsert(&product).await {
                Ok(()) => summary.persisted += 1,
                Err(e) => {
                    // Fatal for this candidate's write only
                    error!(asin = %product.asin, "persistence failed: {e}");
                }
            }
        }

        if summary.persisted == 0 {
            return Err(ScrapeError::NoProductsExtracted);
        }

        info!(
            persisted = summary.persisted,
            skipped = summary.skipped,
            "run complete"
        );
        Ok(summary)
    }
}
