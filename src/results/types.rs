//! Search hit and engine bookkeeping types

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single ranked search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The URL of the result
    pub url: String,
    /// The title of the result
    pub title: String,
    /// Content snippet
    #[serde(default)]
    pub snippet: String,
    /// Engine that first returned this result
    pub engine: String,
    /// All engines that returned this result (after merging)
    #[serde(default)]
    pub engines: HashSet<String>,
    /// Positions in each engine's results
    #[serde(default)]
    pub positions: Vec<u32>,
    /// Calculated relevance score
    #[serde(default)]
    pub score: f64,
}

impl SearchHit {
    /// Create a new hit
    pub fn new(url: impl Into<String>, title: impl Into<String>, engine: impl Into<String>) -> Self {
        let url = url.into();
        let engine = engine.into();
        let mut engines = HashSet::new();
        engines.insert(engine.clone());

        Self {
            url,
            title: title.into(),
            snippet: String::new(),
            engine,
            engines,
            positions: vec![],
            score: 0.0,
        }
    }

    /// Add a snippet
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Add a position
    pub fn with_position(mut self, position: u32) -> Self {
        self.positions.push(position);
        self
    }

    /// Merge another hit for the same page into this one
    pub fn merge(&mut self, other: &SearchHit) {
        self.engines.extend(other.engines.iter().cloned());
        self.positions.extend(other.positions.iter().copied());

        if self.snippet.is_empty() && !other.snippet.is_empty() {
            self.snippet = other.snippet.clone();
        }
    }

    /// Calculate the score based on positions and engine weights
    pub fn calculate_score(&mut self, engine_weights: &HashMap<String, f64>) {
        let mut weight = 1.0;

        for engine in &self.engines {
            if let Some(w) = engine_weights.get(engine) {
                weight *= w;
            }
        }

        weight *= self.engines.len() as f64;

        self.score = self
            .positions
            .iter()
            .map(|&pos| weight / pos.max(1) as f64)
            .sum();
    }
}

/// Engine response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Engine name
    pub engine: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of results returned
    pub result_count: usize,
}

/// Engine error types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineError {
    Timeout,
    NetworkError,
    HttpError(u16),
    ParseError,
    AccessDenied,
    Captcha,
    TooManyRequests,
    Suspended,
    Unknown,
}

impl EngineError {
    /// Whether the engine should be suspended for a while after this error
    pub fn suspends(&self) -> bool {
        matches!(
            self,
            Self::Captcha | Self::TooManyRequests | Self::AccessDenied | Self::NetworkError
        )
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::NetworkError => write!(f, "Network error"),
            Self::HttpError(code) => write!(f, "HTTP error: {}", code),
            Self::ParseError => write!(f, "Failed to parse response"),
            Self::AccessDenied => write!(f, "Access denied"),
            Self::Captcha => write!(f, "CAPTCHA required"),
            Self::TooManyRequests => write!(f, "Too many requests"),
            Self::Suspended => write!(f, "Engine suspended"),
            Self::Unknown => write!(f, "Unknown error"),
        }
    }
}

/// An unresponsive engine record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresponsiveEngine {
    pub name: String,
    pub error: EngineError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_snippet() {
        let mut a = SearchHit::new("https://a.com", "A", "google").with_position(1);
        let b = SearchHit::new("https://a.com", "A", "brave")
            .with_snippet("from brave")
            .with_position(3);
        a.merge(&b);

        assert_eq!(a.engines.len(), 2);
        assert_eq!(a.positions, vec![1, 3]);
        assert_eq!(a.snippet, "from brave");
    }

    #[test]
    fn test_score_rewards_agreement() {
        let weights = HashMap::new();
        let mut single = SearchHit::new("https://a.com", "A", "google").with_position(1);
        let mut shared = SearchHit::new("https://b.com", "B", "google").with_position(1);
        shared.merge(&SearchHit::new("https://b.com", "B", "brave").with_position(1));

        single.calculate_score(&weights);
        shared.calculate_score(&weights);
        assert!(shared.score > single.score);
    }
}
