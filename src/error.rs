//! Error types shared across providers and the research loop

use crate::research::ResearchContext;
use thiserror::Error;

/// A provider call (search, fetch, completion) that produced no usable output
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("empty response")]
    EmptyResponse,
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("provider suspended: {0}")]
    Suspended(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Http { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Run-level failure returned by [`crate::research::Researcher::run`]
///
/// Both variants keep the context gathered so far so callers can inspect it.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("final synthesis failed: {source}")]
    SynthesisFailed {
        #[source]
        source: ProviderError,
        context: ResearchContext,
    },
    #[error("research run cancelled")]
    Cancelled { context: ResearchContext },
}

impl ResearchError {
    /// Context accumulated before the run failed
    pub fn context(&self) -> &ResearchContext {
        match self {
            Self::SynthesisFailed { context, .. } | Self::Cancelled { context } => context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::Http { status: 503 }.is_transient());
        assert!(ProviderError::Http { status: 429 }.is_transient());
        assert!(!ProviderError::Http { status: 404 }.is_transient());
        assert!(!ProviderError::Decode("bad".into()).is_transient());
        assert!(!ProviderError::Suspended("brave".into()).is_transient());
    }
}
