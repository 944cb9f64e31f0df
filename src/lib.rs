//! Deep Research: an iterative web research agent
//!
//! Given a question, the agent searches the web, reads the pages it finds,
//! asks a language model to summarize each one and propose follow-up
//! queries, explores those breadth-first within fixed budgets, and finally
//! synthesizes an answer from the collected summaries.

pub mod config;
pub mod engines;
pub mod error;
pub mod fetch;
pub mod llm;
pub mod metrics;
pub mod network;
pub mod research;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{ProviderError, ResearchError};
pub use fetch::FetchExtractProvider;
pub use llm::LlmProvider;
pub use research::{Answer, ResearchReport, Researcher, RunBudget};
pub use search::SearchProvider;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for engine requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
