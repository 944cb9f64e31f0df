//! Research data model

use crate::config::ResearchSettings;
use crate::metrics::RunStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical form of a query used for deduplication
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Where a follow-up query came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOrigin {
    /// Text of the query whose source proposed this one
    pub query: String,
    /// Source that proposed it
    pub url: String,
}

/// A query waiting in, or taken from, the frontier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchQuery {
    pub text: String,
    /// Distance from the seed question
    pub depth: u32,
    pub origin: Option<QueryOrigin>,
}

impl ResearchQuery {
    /// The initial question, at depth 0
    pub fn seed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            depth: 0,
            origin: None,
        }
    }

    /// A query proposed while processing `url` for `parent`
    pub fn follow_up(text: impl Into<String>, parent: &ResearchQuery, url: &str) -> Self {
        Self {
            text: text.into(),
            depth: parent.depth + 1,
            origin: Some(QueryOrigin {
                query: parent.text.clone(),
                url: url.to_string(),
            }),
        }
    }

    /// Identity used for deduplication
    pub fn key(&self) -> String {
        normalize_query(&self.text)
    }
}

/// Furthest stage one source reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    FetchFailed,
    ExtractFailed,
    AnalysisFailed,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::FetchFailed => "fetch failed",
            Self::ExtractFailed => "extract failed",
            Self::AnalysisFailed => "analysis failed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of processing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResult {
    pub url: String,
    pub summary: String,
    pub proposed_queries: Vec<String>,
    pub status: SourceStatus,
}

impl SourceResult {
    pub fn ok(url: impl Into<String>, summary: impl Into<String>, proposed_queries: Vec<String>) -> Self {
        Self {
            url: url.into(),
            summary: summary.into(),
            proposed_queries,
            status: SourceStatus::Ok,
        }
    }

    /// A result that contributes nothing
    pub fn failed(url: impl Into<String>, status: SourceStatus) -> Self {
        Self {
            url: url.into(),
            summary: String::new(),
            proposed_queries: Vec::new(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SourceStatus::Ok
    }
}

/// One accepted summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub url: String,
    /// Query that discovered the source
    pub query: String,
    pub summary: String,
}

impl ContextEntry {
    fn render(&self) -> String {
        format!(
            "Source: {}\nQuery: {}\nSummary: {}",
            self.url, self.query, self.summary
        )
    }
}

const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// Accepted summaries in discovery order
///
/// Append-only: entries are never edited or removed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchContext {
    entries: Vec<ContextEntry>,
}

impl ResearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: ContextEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full text block handed to synthesis
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ContextEntry::render)
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }

    /// The most recent entries that fit in `max_chars`, oldest first
    ///
    /// When even the newest entry is too long it is cut to size. `None` for
    /// an empty context.
    pub fn render_window(&self, max_chars: usize) -> Option<String> {
        let newest = self.entries.last()?;

        let mut picked: Vec<String> = Vec::new();
        let mut used = 0;
        for entry in self.entries.iter().rev() {
            let text = entry.render();
            let cost = text.chars().count()
                + if picked.is_empty() {
                    0
                } else {
                    ENTRY_SEPARATOR.len()
                };
            if used + cost > max_chars {
                break;
            }
            used += cost;
            picked.push(text);
        }

        if picked.is_empty() {
            return Some(newest.render().chars().take(max_chars).collect());
        }
        picked.reverse();
        Some(picked.join(ENTRY_SEPARATOR))
    }
}

/// Most follow-up queries kept from a single source
pub const MAX_PROPOSED_QUERIES: usize = 3;

/// Limits that guarantee a run terminates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunBudget {
    pub max_depth: u32,
    pub max_queries_total: usize,
    pub max_sources_per_query: usize,
    pub max_total_sources: usize,
    pub max_proposed_queries: usize,
    pub max_concurrent_sources: usize,
    pub context_window_chars: usize,
}

impl Default for RunBudget {
    fn default() -> Self {
        Self::from(&ResearchSettings::default())
    }
}

impl From<&ResearchSettings> for RunBudget {
    fn from(s: &ResearchSettings) -> Self {
        Self {
            max_depth: s.max_depth,
            max_queries_total: s.max_queries_total,
            max_sources_per_query: s.max_sources_per_query,
            max_total_sources: s.max_total_sources,
            max_proposed_queries: s.max_proposed_queries.min(MAX_PROPOSED_QUERIES),
            max_concurrent_sources: s.max_concurrent_sources.max(1),
            context_window_chars: s.context_window_chars,
        }
    }
}

/// Why the loop stopped dispatching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every reachable query was processed
    FrontierExhausted,
    /// `max_queries_total` reached with queries still pending
    QueryBudgetExhausted,
    /// `max_total_sources` reached with queries still pending
    SourceBudgetExhausted,
}

/// Final answer of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Answer {
    /// Synthesis output, verbatim
    Synthesized(String),
    /// No source produced a usable summary
    InsufficientEvidence,
}

impl Answer {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Synthesized(text) => Some(text),
            Self::InsufficientEvidence => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synthesized(text) => write!(f, "{}", text),
            Self::InsufficientEvidence => {
                write!(f, "No information was found to answer the question.")
            }
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub run_id: Uuid,
    pub question: String,
    pub answer: Answer,
    pub context: ResearchContext,
    pub termination: TerminationReason,
    pub stats: RunStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, summary: &str) -> ContextEntry {
        ContextEntry {
            url: url.to_string(),
            query: "q".to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  What IS   photosynthesis? "), "what is photosynthesis?");
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn test_follow_up_depth() {
        let seed = ResearchQuery::seed("root");
        let child = ResearchQuery::follow_up("child", &seed, "https://a.com");
        let grandchild = ResearchQuery::follow_up("grandchild", &child, "https://b.com");
        assert_eq!(child.depth, 1);
        assert_eq!(grandchild.depth, 2);
        assert_eq!(grandchild.origin.unwrap().query, "child");
    }

    #[test]
    fn test_render_full_context() {
        let mut context = ResearchContext::new();
        assert_eq!(context.render(), "");
        context.push(entry("https://a.com", "first"));
        context.push(entry("https://b.com", "second"));

        let rendered = context.render();
        assert_eq!(
            rendered,
            "Source: https://a.com\nQuery: q\nSummary: first\n\n---\n\nSource: https://b.com\nQuery: q\nSummary: second"
        );
    }

    #[test]
    fn test_render_window_keeps_newest() {
        let mut context = ResearchContext::new();
        assert!(context.render_window(100).is_none());

        context.push(entry("https://a.com", &"a".repeat(50)));
        context.push(entry("https://b.com", "short"));

        let window = context.render_window(60).unwrap();
        assert!(window.contains("https://b.com"));
        assert!(!window.contains("https://a.com"));

        let everything = context.render_window(10_000).unwrap();
        assert_eq!(everything, context.render());

        let cut = context.render_window(10).unwrap();
        assert_eq!(cut, "Source: ht");
    }

    #[test]
    fn test_answer_serialization() {
        let json = serde_json::to_value(Answer::Synthesized("done".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "synthesized", "text": "done"}));
        let json = serde_json::to_value(Answer::InsufficientEvidence).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "insufficient_evidence"}));
    }

    #[test]
    fn test_budget_from_settings() {
        let settings = ResearchSettings {
            max_concurrent_sources: 0,
            ..Default::default()
        };
        let budget = RunBudget::from(&settings);
        assert_eq!(budget.max_concurrent_sources, 1);
        assert_eq!(budget.max_depth, 2);
    }

    #[test]
    fn test_proposed_queries_never_exceed_three() {
        let settings = ResearchSettings {
            max_proposed_queries: 10,
            ..Default::default()
        };
        assert_eq!(RunBudget::from(&settings).max_proposed_queries, 3);

        let fewer = ResearchSettings {
            max_proposed_queries: 1,
            ..Default::default()
        };
        assert_eq!(RunBudget::from(&fewer).max_proposed_queries, 1);
    }
}
