//! Screener page sources.
//!
//! Defines the `ScreenerSource` trait and provides the Finviz
//! implementation. Timeout and retry policy belong to the source; the
//! monitor treats every fetch failure uniformly.

pub mod finviz;

use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over the page being monitored.
///
/// Implementors return the raw listing payload or fail with a transport
/// error. Nothing here interprets the payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScreenerSource: Send + Sync {
    /// Fetch the raw listing page text.
    async fn fetch_page(&self) -> Result<String>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
