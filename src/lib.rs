//! amz-bestsellers - Amazon category best-seller scraper with persistence
//!
//! Scrapes the top-ranked products from an Amazon category listing with TLS
//! fingerprint emulation, stores them in SQLite, and serves them back over
//! a small read-only JSON API.

pub mod amazon;
pub mod anti_detection;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod run;
pub mod store;

pub use amazon::models::{Candidate, Product, RunSummary};
pub use config::Config;
pub use error::ScrapeError;
pub use store::Store;
