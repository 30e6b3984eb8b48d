//! Listing page parser: turns a category page into ranked candidates.

use crate::amazon::models::Candidate;
use crate::amazon::selectors::listing;
use crate::error::ScrapeError;
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Parses a loaded category listing into at most `max` ranked candidates.
///
/// Cards are scanned top-down in display order; a card whose ASIN was already
/// seen is dropped, so the first occurrence (lowest rank) wins. Zero cards is
/// fatal for the run; a shortfall between 1 and `max - 1` is only a signal.
pub fn extract_candidates(
    html: &str,
    base_url: &str,
    max: usize,
) -> Result<Vec<Candidate>, ScrapeError> {
    let document = Html::parse_document(html);

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::with_capacity(max);

    for card in document.select(&listing::CARD) {
        let asin = match card.value().attr(listing::ASIN_ATTR) {
            Some(asin) if !asin.trim().is_empty() => asin.trim().to_string(),
            _ => continue,
        };

        if !seen.insert(asin.clone()) {
            debug!(asin, "duplicate ASIN in listing, keeping first occurrence");
            continue;
        }

        let detail_url = card
            .select(&listing::DETAIL_LINK)
            .next()
            .and_then(|e| e.value().attr("href"))
            .map(|href| {
                if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{}{}", base_url, href)
                }
            })
            .unwrap_or_else(|| format!("{}/dp/{}", base_url, asin));

        let rank = (candidates.len() + 1) as u8;
        candidates.push(Candidate { asin, detail_url, rank });

        if candidates.len() >= max {
            break;
        }
    }

    if candidates.is_empty() {
        return Err(ScrapeError::ListingEmpty);
    }

    if candidates.len() < max {
        warn!(found = candidates.len(), requested = max, "listing yielded fewer candidates");
    }

    debug!(count = candidates.len(), "collected listing candidates");
    Ok(candidates)
}
