//! Mutable bookkeeping of a single run

use super::models::*;
use crate::metrics::RunMetrics;
use crate::results::normalize_url;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Frontier, visited sets and context of one run
///
/// Owned by the orchestrator task; every mutation goes through `&mut self`,
/// so merges are serialized even when source pipelines run concurrently.
#[derive(Debug)]
pub struct RunState {
    frontier: VecDeque<ResearchQuery>,
    /// Normalized URLs handed to the source processor
    visited: HashSet<String>,
    /// Normalized texts of every query ever enqueued, seed included
    seen_queries: HashSet<String>,
    pub context: ResearchContext,
    pub iterations_done: usize,
    pub sources_processed: usize,
    pub budget: RunBudget,
}

impl RunState {
    /// Seed a run with the question at depth 0
    pub fn new(question: &str, budget: RunBudget) -> Self {
        let seed = ResearchQuery::seed(question.trim());
        let mut seen_queries = HashSet::new();
        seen_queries.insert(seed.key());

        Self {
            frontier: VecDeque::from([seed]),
            visited: HashSet::new(),
            seen_queries,
            context: ResearchContext::new(),
            iterations_done: 0,
            sources_processed: 0,
            budget,
        }
    }

    /// Next query in breadth-first order
    pub fn next_query(&mut self) -> Option<ResearchQuery> {
        self.frontier.pop_front()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Sources that may still be processed
    pub fn remaining_sources(&self) -> usize {
        self.budget
            .max_total_sources
            .saturating_sub(self.sources_processed)
    }

    /// Which bound stops the loop, if any
    ///
    /// Budget reasons are only reported while work is still pending.
    pub fn exhausted(&self) -> Option<TerminationReason> {
        if self.frontier.is_empty() {
            Some(TerminationReason::FrontierExhausted)
        } else if self.iterations_done >= self.budget.max_queries_total {
            Some(TerminationReason::QueryBudgetExhausted)
        } else if self.sources_processed >= self.budget.max_total_sources {
            Some(TerminationReason::SourceBudgetExhausted)
        } else {
            None
        }
    }

    /// Mark a URL as scheduled for fetching
    ///
    /// Returns false when it was already scheduled earlier in the run.
    pub fn claim_url(&mut self, url: &str) -> bool {
        self.visited.insert(normalize_url(url))
    }

    /// Fold one source result into the run
    ///
    /// Only successful results reach the context; their proposed queries are
    /// enqueued one level deeper, in the order they were proposed.
    pub fn merge(&mut self, query: &ResearchQuery, result: SourceResult, metrics: &RunMetrics) {
        if !result.is_ok() {
            return;
        }

        self.context.push(ContextEntry {
            url: result.url.clone(),
            query: query.text.clone(),
            summary: result.summary,
        });

        for text in result.proposed_queries {
            let follow_up = ResearchQuery::follow_up(text.trim(), query, &result.url);
            self.enqueue(follow_up, metrics);
        }
    }

    fn enqueue(&mut self, query: ResearchQuery, metrics: &RunMetrics) {
        let key = query.key();
        if key.is_empty() {
            return;
        }
        if query.depth > self.budget.max_depth {
            debug!("Discarding '{}' at depth {}", query.text, query.depth);
            metrics.record_beyond_depth();
            return;
        }
        if !self.seen_queries.insert(key) {
            debug!("Skipping duplicate query '{}'", query.text);
            metrics.record_duplicate_query();
            return;
        }

        debug!("Enqueued '{}' at depth {}", query.text, query.depth);
        metrics.record_enqueued();
        self.frontier.push_back(query);
    }
}
