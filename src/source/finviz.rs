//! Finviz screener page client.
//!
//! Fetches the screener listing over HTTPS. Finviz serves plain HTML and
//! rejects default library user agents, so the client identifies as a
//! desktop browser and sends a site Referer.
//!
//! Screener URL shape: `https://finviz.com/screener.ashx?v=111&f=<filters>`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::ScreenerSource;
use crate::config::MonitorConfig;

const SOURCE_NAME: &str = "finviz";

/// Request timeout. Finviz normally answers in well under a second;
/// anything slower is treated as a transport failure for the cycle.
const FETCH_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REFERER: &str = "https://finviz.com/";

/// Finviz screener page client.
pub struct FinvizClient {
    http: Client,
    url: String,
}

impl FinvizClient {
    /// Create a new client for the configured screener view and filters.
    pub fn new(cfg: &MonitorConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for Finviz")?;

        Ok(Self {
            http,
            url: cfg.screener_url(),
        })
    }

    /// The fully built screener URL this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ScreenerSource for FinvizClient {
    async fn fetch_page(&self) -> Result<String> {
        debug!(url = %self.url, "Fetching screener page");

        let resp = self
            .http
            .get(&self.url)
            .header("Referer", REFERER)
            .send()
            .await
            .context("Finviz request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Finviz returned {status}");
        }

        resp.text()
            .await
            .context("Failed to read Finviz response body")
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
