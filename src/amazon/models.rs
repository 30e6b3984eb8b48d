//! Data models for scraped products and listing candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully extracted product record, one row in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Amazon Standard Identification Number
    pub asin: String,
    /// Product title
    pub title: String,
    /// Listing position at scrape time (1-5)
    pub rank: u8,
    /// Current price; 0.0 when every price strategy missed
    pub price: f64,
    /// Currency symbol captured alongside the price
    pub currency: String,
    /// Pre-discount price, only when strictly greater than `price`
    pub list_price: Option<f64>,
    /// Derived from `price`/`list_price`, one decimal place
    pub discount_percent: Option<f64>,
    /// Star rating (0.0 - 5.0)
    pub rating: Option<f32>,
    /// Number of customer reviews
    pub reviews_count: Option<u32>,
    /// Whether the Prime badge was present
    pub is_prime: bool,
    /// Best Sellers Rank, e.g. "#3 in Home & Kitchen"
    pub best_sellers_rank: Option<String>,
    /// Up to 5 feature bullets, trimmed
    pub bullet_points: Vec<String>,
    /// Main product image URL
    pub main_image_url: Option<String>,
    /// Extraction completion time
    pub scraped_at: DateTime<Utc>,
}

impl Product {
    /// Recomputes the derived discount from the price pair.
    ///
    /// Present iff a list price exists; the list-price extractor already
    /// guarantees `list_price > price`.
    pub fn compute_discount(price: f64, list_price: Option<f64>) -> Option<f64> {
        list_price.map(|lp| {
            let pct = (lp - price) / lp * 100.0;
            (pct * 10.0).round() / 10.0
        })
    }

    /// Returns the price for stats purposes, ignoring the 0.0 "unknown" sentinel.
    pub fn known_price(&self) -> Option<f64> {
        if self.price > 0.0 {
            Some(self.price)
        } else {
            None
        }
    }
}

/// A listing-derived reference not yet fully extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub asin: String,
    pub detail_url: String,
    /// Listing position, ascending, 1-based
    pub rank: u8,
}

/// Outcome counters for one end-to-end run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Candidates requested (the top-N cap)
    pub requested: usize,
    /// Candidates the listing actually yielded
    pub found: usize,
    /// Candidates whose detail page was extracted
    pub extracted: usize,
    /// Products accepted by the store
    pub persisted: usize,
    /// Candidates skipped after exhausting retries
    pub skipped: usize,
}

impl RunSummary {
    /// A run succeeds iff at least one product made it into the store.
    pub fn is_success(&self) -> bool {
        self.persisted > 0
    }
}
