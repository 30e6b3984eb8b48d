//! Error taxonomy for a scrape run.
//!
//! Only listing-level failures (or a run where nothing was persisted) are
//! fatal. Candidate-level failures are recoverable and handled by the
//! orchestrator; field-level misses are plain `None`s inside the extractors
//! and never surface here.

use thiserror::Error;

/// Failures a scrape run can report.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Listing page failed to load after all retries. Fatal, nothing persisted.
    #[error("listing page unreachable after {attempts} attempts: {source}")]
    ListingUnreachable {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Listing loaded but yielded zero ranked candidates. Fatal.
    #[error("listing page yielded no ranked candidates")]
    ListingEmpty,

    /// One detail page failed after all retries. The candidate is skipped.
    #[error("detail page for {asin} unreachable after {attempts} attempts: {source}")]
    CandidateUnreachable {
        asin: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// The store rejected a write. Fatal for that candidate only.
    #[error("persistence failed: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The listing loaded but none of the attempted candidates made it
    /// into the store.
    #[error("no products were extracted from this run")]
    NoProductsExtracted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::ListingEmpty;
        assert_eq!(err.to_string(), "listing page yielded no ranked candidates");

        let err = ScrapeError::CandidateUnreachable {
            asin: "B0TEST0001".to_string(),
            attempts: 3,
            source: anyhow::anyhow!("connection refused"),
        };
        let msg = err.to_string();
        assert!(msg.contains("B0TEST0001"));
        assert!(msg.contains("3 attempts"));
    }

    #[test]
    fn test_persistence_from_sqlx() {
        let err: ScrapeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ScrapeError::Persistence(_)));
    }
}
