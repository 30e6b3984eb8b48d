//! Amazon-specific modules for the HTTP client, listing and product
//! extraction, and data models.

pub mod client;
pub mod extract;
pub mod fields;
pub mod listing;
pub mod models;
pub mod selectors;

pub use client::{fetch_with_retries, BrowserClient, PageFetcher};
pub use extract::ProductExtractor;
pub use models::{Candidate, Product, RunSummary};
