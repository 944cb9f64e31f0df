//! Fetch-extract provider capability

use crate::error::ProviderError;
use async_trait::async_trait;
use tracing::warn;

/// Turns a URL into plain text
///
/// The two stages are exposed separately so callers can tell a page that
/// could not be downloaded from one that had no usable text.
#[async_trait]
pub trait FetchExtractProvider: Send + Sync {
    /// Download the raw page
    async fn fetch(&self, url: &str) -> Result<String, ProviderError>;

    /// Reduce a raw page to plain text, `None` when nothing substantive is left
    fn extract(&self, raw: &str, url: &str) -> Option<String>;

    /// Both stages, collapsing any failure to `None`
    async fn fetch_extract(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(raw) => self.extract(&raw, url),
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                None
            }
        }
    }
}
