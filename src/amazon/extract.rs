//! Per-candidate product extraction.
//!
//! Given one listing candidate, loads the detail page (with bounded retries)
//! and drives every field extractor against it. Field misses are absorbed;
//! only navigation-level failure bubbles up, and then only as a skippable
//! candidate error.

use crate::amazon::client::{fetch_with_retries, PageFetcher};
use crate::amazon::fields;
use crate::amazon::models::{Candidate, Product};
use crate::amazon::selectors::errors;
use crate::error::ScrapeError;
use anyhow::Result;
use chrono::Utc;
use scraper::Html;
use std::time::Duration;
use tracing::{info, warn};

/// Extracts one product from its detail page.
pub struct ProductExtractor<'a> {
    client: &'a dyn PageFetcher,
    max_retries: u32,
    backoff_base: Duration,
}

impl<'a> ProductExtractor<'a> {
    pub fn new(client: &'a dyn PageFetcher, max_retries: u32, backoff_base: Duration) -> Self {
        Self { client, max_retries, backoff_base }
    }

    /// Loads the candidate's detail page and assembles a Product.
    ///
    /// Navigation failure after all retries yields `CandidateUnreachable`;
    /// the caller decides to skip. Field-level misses never fail this call.
    pub async fn extract(&self, candidate: &Candidate) -> Result<Product, ScrapeError> {
        info!(asin = %candidate.asin, rank = candidate.rank, "fetching detail page");

        let html = fetch_with_retries(
            self.client,
            &candidate.detail_url,
            self.max_retries,
            self.backoff_base,
        )
        .await
        .map_err(|source| ScrapeError::CandidateUnreachable {
            asin: candidate.asin.clone(),
            attempts: self.max_retries + 1,
            source,
        })?;

        build_product(&html, candidate).map_err(|source| ScrapeError::CandidateUnreachable {
            asin: candidate.asin.clone(),
            attempts: self.max_retries + 1,
            source,
        })
    }
}

/// Checks for CAPTCHA or Amazon's error page. A blocked page carries no
/// product data, so it counts as unreachable rather than as field misses.
pub fn detect_page_errors(doc: &Html) -> Result<()> {
    if doc.select(&errors::CAPTCHA).next().is_some() {
        anyhow::bail!("CAPTCHA page detected, request was blocked");
    }
    if doc.select(&errors::DOG_PAGE).next().is_some() {
        anyhow::bail!("Amazon error page detected (503)");
    }
    Ok(())
}

/// Runs all field extractors against a loaded detail page.
///
/// Pure aside from the `scraped_at` clock read, so it is directly testable
/// with synthetic fixtures.
pub fn build_product(html: &str, candidate: &Candidate) -> Result<Product> {
    let doc = Html::parse_document(html);
    detect_page_errors(&doc)?;

    let title = fields::extract_title(&doc).unwrap_or_else(|| {
        warn!(asin = %candidate.asin, "title not found, using placeholder");
        format!("Product {}", candidate.asin)
    });

    let (price, currency) = match fields::extract_price(&doc) {
        Some((value, symbol)) => (value, symbol),
        None => {
            warn!(asin = %candidate.asin, "price not found");
            (0.0, "$".to_string())
        }
    };

    let list_price = fields::extract_list_price(&doc, price);
    let discount_percent = Product::compute_discount(price, list_price);

    Ok(Product {
        asin: candidate.asin.clone(),
        title,
        rank: candidate.rank,
        price,
        currency,
        list_price,
        discount_percent,
        rating: fields::extract_rating(&doc),
        reviews_count: fields::extract_reviews_count(&doc),
        is_prime: fields::extract_is_prime(&doc),
        best_sellers_rank: fields::extract_best_sellers_rank(&doc),
        bullet_points: fields::extract_bullet_points(&doc),
        main_image_url: fields::extract_main_image_url(&doc),
        scraped_at: Utc::now(),
    })
}
