//! Identity rotation and human-like pacing.
//!
//! Advisory only: pacing and scroll simulation lower the odds of tripping
//! rate limiting but guarantee nothing. Their failures are never allowed to
//! affect the run.

use crate::amazon::client::PageFetcher;
use rand::RngExt;
use std::time::Duration;
use tracing::debug;

/// Fixed pool of desktop Chrome user-agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Supplies identities and pacing to the browsing client.
pub struct AntiDetection {
    pace_min: Duration,
    pace_max: Duration,
}

impl AntiDetection {
    /// Creates a controller with the given pacing window.
    pub fn new(pace_min_ms: u64, pace_max_ms: u64) -> Self {
        Self {
            pace_min: Duration::from_millis(pace_min_ms),
            pace_max: Duration::from_millis(pace_max_ms.max(pace_min_ms)),
        }
    }

    /// Draws one user-agent uniformly at random. Stateless: repeats allowed.
    pub fn next_identity(&self) -> &'static str {
        let idx = rand::rng().random_range(0..USER_AGENTS.len());
        USER_AGENTS[idx]
    }

    /// Blocks for a uniform random duration inside the pacing window, then
    /// issues a few simulated scrolls. Scroll errors are logged and swallowed.
    pub async fn pace_and_simulate(&self, client: &dyn PageFetcher) {
        let delay = self.random_delay();
        debug!(?delay, "pacing before navigation");
        tokio::time::sleep(delay).await;

        if let Err(e) = client.simulate_scroll().await {
            debug!("scroll simulation failed (ignored): {e:#}");
        }
    }

    fn random_delay(&self) -> Duration {
        if self.pace_max <= self.pace_min {
            return self.pace_min;
        }
        let span_ms = (self.pace_max - self.pace_min).as_millis() as u64;
        self.pace_min + Duration::from_millis(rand::rng().random_range(0..=span_ms))
    }
}
