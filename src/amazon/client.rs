//! HTTP browsing client using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for page navigation - enables mocking for tests.
///
/// One fetcher instance models one browser session: the orchestrator sets the
/// identity before each navigation and drives it strictly sequentially.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Loads a page and returns the HTML body.
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Replaces the user-agent used for subsequent navigations.
    fn set_identity(&self, user_agent: &str);

    /// Advisory scroll simulation against the currently loaded page.
    /// Callers swallow errors from this; it must never matter.
    async fn simulate_scroll(&self) -> Result<()>;
}

/// Amazon HTTP client with browser impersonation and rotating identity.
pub struct BrowserClient {
    client: Client,
    user_agent: Mutex<String>,
}

impl BrowserClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.nav_timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, user_agent: Mutex::new(String::new()) })
    }
}

#[async_trait]
impl PageFetcher for BrowserClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let user_agent = self.user_agent.lock().expect("identity lock poisoned").clone();

        let mut request = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1");

        if !user_agent.is_empty() {
            request = request.header("User-Agent", user_agent);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing pacing.");
            anyhow::bail!("Rate limited by Amazon. Try a proxy or longer pacing window.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    fn set_identity(&self, user_agent: &str) {
        *self.user_agent.lock().expect("identity lock poisoned") = user_agent.to_string();
    }

    async fn simulate_scroll(&self) -> Result<()> {
        // No DOM to scroll over plain HTTP; the human-shaped part is the
        // pause between "scroll steps".
        for step in 1..=3u32 {
            debug!(step, "simulated scroll step");
            tokio::time::sleep(Duration::from_millis(120)).await;
        }
        Ok(())
    }
}

/// Fetches a page with bounded retries and doubling backoff (1s, 2s, 4s at
/// the default base). Returns the body, or the last error once the retry
/// budget is exhausted.
pub async fn fetch_with_retries(
    client: &dyn PageFetcher,
    url: &str,
    max_retries: u32,
    backoff_base: Duration,
) -> Result<String> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            // Exponent capped so oversized retry budgets cannot overflow
            let backoff = backoff_base * 2u32.pow((attempt - 1).min(16));
            debug!(attempt, ?backoff, "retrying navigation");
            tokio::time::sleep(backoff).await;
        }

        match client.fetch(url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                warn!(url, attempt = attempt + 1, "navigation failed: {e:#}");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.expect("at least one attempt was made"))
}
