//! Per-run metrics
//!
//! Counters are atomic so concurrently running source pipelines can record
//! into the same collector; a [`RunStats`] snapshot goes into the report.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Which external call a latency sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Fetch,
    Llm,
}

/// Metrics collector for one research run
#[derive(Debug, Default)]
pub struct RunMetrics {
    queries_dispatched: AtomicU64,
    search_failures: AtomicU64,
    sources_processed: AtomicU64,
    sources_ok: AtomicU64,
    fetch_failures: AtomicU64,
    extract_failures: AtomicU64,
    analysis_failures: AtomicU64,
    salvaged_replies: AtomicU64,
    duplicate_urls: AtomicU64,
    queries_enqueued: AtomicU64,
    duplicate_queries: AtomicU64,
    queries_beyond_depth: AtomicU64,
    llm_calls: AtomicU64,
    search_ms: AtomicU64,
    fetch_ms: AtomicU64,
    llm_ms: AtomicU64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_query(&self) {
        self.queries_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_failure(&self) {
        self.search_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_source(&self) {
        self.sources_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_ok(&self) {
        self.sources_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extract_failure(&self) {
        self.extract_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_analysis_failure(&self) {
        self.analysis_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_salvaged_reply(&self) {
        self.salvaged_replies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_url(&self) {
        self.duplicate_urls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enqueued(&self) {
        self.queries_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_query(&self) {
        self.duplicate_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_beyond_depth(&self) {
        self.queries_beyond_depth.fetch_add(1, Ordering::Relaxed);
    }

    /// Record time spent in an external call
    pub fn record_latency(&self, stage: Stage, elapsed: Duration) {
        let ms = elapsed.as_millis() as u64;
        let counter = match stage {
            Stage::Search => &self.search_ms,
            Stage::Fetch => &self.fetch_ms,
            Stage::Llm => {
                self.llm_calls.fetch_add(1, Ordering::Relaxed);
                &self.llm_ms
            }
        };
        counter.fetch_add(ms, Ordering::Relaxed);
    }

    /// Current values
    pub fn snapshot(&self) -> RunStats {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        RunStats {
            queries_dispatched: get(&self.queries_dispatched),
            search_failures: get(&self.search_failures),
            sources_processed: get(&self.sources_processed),
            sources_ok: get(&self.sources_ok),
            fetch_failures: get(&self.fetch_failures),
            extract_failures: get(&self.extract_failures),
            analysis_failures: get(&self.analysis_failures),
            salvaged_replies: get(&self.salvaged_replies),
            duplicate_urls: get(&self.duplicate_urls),
            queries_enqueued: get(&self.queries_enqueued),
            duplicate_queries: get(&self.duplicate_queries),
            queries_beyond_depth: get(&self.queries_beyond_depth),
            llm_calls: get(&self.llm_calls),
            search_ms: get(&self.search_ms),
            fetch_ms: get(&self.fetch_ms),
            llm_ms: get(&self.llm_ms),
        }
    }
}

/// Counters reported with a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub queries_dispatched: u64,
    pub search_failures: u64,
    pub sources_processed: u64,
    pub sources_ok: u64,
    pub fetch_failures: u64,
    pub extract_failures: u64,
    pub analysis_failures: u64,
    /// Analysis replies that needed the salvage decode
    pub salvaged_replies: u64,
    pub duplicate_urls: u64,
    pub queries_enqueued: u64,
    pub duplicate_queries: u64,
    pub queries_beyond_depth: u64,
    pub llm_calls: u64,
    pub search_ms: u64,
    pub fetch_ms: u64,
    pub llm_ms: u64,
}

impl RunStats {
    /// Share of processed sources that made it into the context
    pub fn success_rate(&self) -> f64 {
        if self.sources_processed == 0 {
            0.0
        } else {
            self.sources_ok as f64 / self.sources_processed as f64 * 100.0
        }
    }
}
