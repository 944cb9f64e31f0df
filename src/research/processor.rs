//! Per-URL pipeline: fetch, extract, analyze, parse

use super::models::{ResearchQuery, SourceResult, SourceStatus, MAX_PROPOSED_QUERIES};
use crate::fetch::FetchExtractProvider;
use crate::llm::{analysis_prompt, parse_analysis, LlmProvider, ParseOutcome};
use crate::metrics::{RunMetrics, Stage};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Turns one URL into a [`SourceResult`]
#[derive(Clone)]
pub struct SourceProcessor {
    fetcher: Arc<dyn FetchExtractProvider>,
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
    fetch_timeout: Duration,
    llm_timeout: Duration,
    max_proposed_queries: usize,
}

impl SourceProcessor {
    pub fn new(fetcher: Arc<dyn FetchExtractProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            fetcher,
            llm,
            system_prompt: crate::config::LlmSettings::default().system_prompt,
            fetch_timeout: Duration::from_secs(20),
            llm_timeout: Duration::from_secs(60),
            max_proposed_queries: MAX_PROPOSED_QUERIES,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_timeouts(mut self, fetch: Duration, llm: Duration) -> Self {
        self.fetch_timeout = fetch;
        self.llm_timeout = llm;
        self
    }

    /// Keep at most `max` follow-ups per source, never more than three
    pub fn with_max_proposed_queries(mut self, max: usize) -> Self {
        self.max_proposed_queries = max.min(MAX_PROPOSED_QUERIES);
        self
    }

    /// Process `url`, found by `query`, against the rendered prior context
    ///
    /// Always yields exactly one result whose status is the furthest stage
    /// reached. `None` only when `cancel` fired between stages.
    pub async fn process(
        &self,
        url: &str,
        query: &ResearchQuery,
        prior_context: Option<&str>,
        cancel: &CancellationToken,
        metrics: &RunMetrics,
    ) -> Option<SourceResult> {
        metrics.inc_source();
        if cancel.is_cancelled() {
            return None;
        }

        let start = Instant::now();
        let fetched = timeout(self.fetch_timeout, self.fetcher.fetch(url)).await;
        metrics.record_latency(Stage::Fetch, start.elapsed());
        let raw = match fetched {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!("Fetch failed for {}: {}", url, e);
                metrics.record_fetch_failure();
                return Some(SourceResult::failed(url, SourceStatus::FetchFailed));
            }
            Err(_) => {
                warn!("Fetch timed out for {} after {:?}", url, self.fetch_timeout);
                metrics.record_fetch_failure();
                return Some(SourceResult::failed(url, SourceStatus::FetchFailed));
            }
        };
        if cancel.is_cancelled() {
            return None;
        }

        let Some(content) = self.fetcher.extract(&raw, url) else {
            warn!("No content extracted from {}", url);
            metrics.record_extract_failure();
            return Some(SourceResult::failed(url, SourceStatus::ExtractFailed));
        };
        if cancel.is_cancelled() {
            return None;
        }

        let prompt = analysis_prompt(
            &query.text,
            &content,
            url,
            prior_context,
            self.max_proposed_queries,
        );
        let start = Instant::now();
        let reply = timeout(self.llm_timeout, self.llm.complete(&self.system_prompt, &prompt)).await;
        metrics.record_latency(Stage::Llm, start.elapsed());
        let reply = match reply {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("Analysis of {} failed: {}", url, e);
                metrics.record_analysis_failure();
                return Some(SourceResult::failed(url, SourceStatus::AnalysisFailed));
            }
            Err(_) => {
                warn!("Analysis of {} timed out after {:?}", url, self.llm_timeout);
                metrics.record_analysis_failure();
                return Some(SourceResult::failed(url, SourceStatus::AnalysisFailed));
            }
        };

        let outcome = parse_analysis(&reply);
        if let ParseOutcome::Salvaged(_) = outcome {
            debug!("Salvaged malformed analysis reply for {}", url);
            metrics.record_salvaged_reply();
        }
        let (summary, queries) = outcome.into_parts();
        let summary = summary.trim();
        if summary.is_empty() {
            warn!("Unusable analysis reply for {}", url);
            metrics.record_analysis_failure();
            return Some(SourceResult::failed(url, SourceStatus::AnalysisFailed));
        }

        let proposed: Vec<String> = queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(self.max_proposed_queries)
            .collect();

        info!(
            "Summarized {} ({} chars, {} follow-ups)",
            url,
            summary.len(),
            proposed.len()
        );
        metrics.record_source_ok();
        Some(SourceResult::ok(url, summary, proposed))
    }
}
