//! Search provider capability

use crate::error::ProviderError;
use crate::results::SearchHit;
use async_trait::async_trait;
use std::time::Duration;

/// Resolves a query string into ranked candidate sources
///
/// `Ok(vec![])` means the search ran and found nothing; `Err` means the
/// provider itself could not answer.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Search for `query`, returning at most `max_results` hits best first
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ProviderError>;

    /// Longest one search can take when the provider bounds its own calls
    ///
    /// Callers should wait at least this long before giving up, so that a
    /// provider timing out one slow backend can still return the others.
    fn deadline(&self) -> Option<Duration> {
        None
    }
}
