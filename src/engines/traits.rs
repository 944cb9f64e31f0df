//! Engine traits and types

use crate::config::EngineConfig;
use crate::network::{HttpRequest, HttpResponse};
use crate::results::SearchHit;

/// Hits returned by a single engine
#[derive(Debug, Clone, Default)]
pub struct EngineResults {
    /// Search hits in engine ranking order
    pub results: Vec<SearchHit>,
    /// Number of total results (if known)
    pub number_of_results: Option<u64>,
}

impl EngineResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<SearchHit>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: SearchHit) {
        self.results.push(result);
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Parameters for building a search request
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Language code
    pub lang: String,
    /// Number of results wanted
    pub max_results: usize,
}

impl RequestParams {
    /// Create new request parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            lang: "en".to_string(),
            max_results: 10,
        }
    }

    /// Set the number of results wanted
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Main engine trait that all search engines must implement
///
/// Engines only build requests and parse responses; the HTTP round trip is
/// done by [`crate::search::MetaSearch`] so timeouts, retries and
/// suspension are handled in one place.
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Short description of the engine
    fn about(&self) -> EngineAbout {
        EngineAbout::default()
    }

    /// Default weight for result scoring
    fn weight(&self) -> f64 {
        1.0
    }

    /// Default timeout in seconds
    fn timeout(&self) -> f64 {
        5.0
    }

    /// Build the HTTP request for a search
    fn request(&self, params: &RequestParams) -> anyhow::Result<HttpRequest>;

    /// Parse the HTTP response into hits
    fn response(&self, response: HttpResponse) -> anyhow::Result<EngineResults>;

    /// Optional initialization (called once on startup)
    fn init(&mut self, _config: &EngineConfig) -> anyhow::Result<()> {
        Ok(())
    }

    /// Optional validation of configuration
    fn validate(&self, _config: &EngineConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Engine metadata
#[derive(Debug, Clone, Default)]
pub struct EngineAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether it uses the official API
    pub use_official_api: bool,
    /// Whether an API key is required
    pub require_api_key: bool,
    /// Result format (HTML, JSON, XML)
    pub results: String,
}

impl EngineAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}

/// Parse a CSS selector known at compile time
pub(crate) fn selector(css: &str) -> anyhow::Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| anyhow::anyhow!("bad selector {}: {:?}", css, e))
}
