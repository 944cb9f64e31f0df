//! Result container for merging and ranking hits from several engines

use super::normalize::normalize_url;
use super::types::*;
use std::collections::{HashMap, HashSet};

/// Aggregates hits from every engine queried for one search
#[derive(Debug, Clone, Default)]
pub struct ResultContainer {
    /// Hits keyed by normalized URL
    results_map: HashMap<String, SearchHit>,
    /// Unresponsive engines
    unresponsive_engines: Vec<UnresponsiveEngine>,
    /// Engine timings
    timings: Vec<Timing>,
    /// Engine weights for scoring
    engine_weights: HashMap<String, f64>,
}

impl ResultContainer {
    /// Create a new empty result container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with engine weights
    pub fn with_weights(weights: HashMap<String, f64>) -> Self {
        Self {
            engine_weights: weights,
            ..Self::default()
        }
    }

    /// Add a hit, merging with an existing one if the URL matches
    pub fn add_result(&mut self, hit: SearchHit) {
        if hit.url.trim().is_empty() {
            return;
        }
        let key = normalize_url(&hit.url);
        if let Some(existing) = self.results_map.get_mut(&key) {
            existing.merge(&hit);
        } else {
            self.results_map.insert(key, hit);
        }
    }

    /// Add multiple hits
    pub fn extend_results(&mut self, hits: Vec<SearchHit>) {
        for hit in hits {
            self.add_result(hit);
        }
    }

    /// Record an unresponsive engine
    pub fn add_unresponsive(&mut self, name: String, error: EngineError) {
        self.unresponsive_engines
            .push(UnresponsiveEngine { name, error });
    }

    /// Record engine timing
    pub fn add_timing(&mut self, timing: Timing) {
        self.timings.push(timing);
    }

    /// All hits sorted by score, ties broken by normalized URL
    pub fn get_ordered_results(&self) -> Vec<SearchHit> {
        let mut keyed: Vec<(&String, SearchHit)> = self
            .results_map
            .iter()
            .map(|(key, hit)| {
                let mut hit = hit.clone();
                hit.calculate_score(&self.engine_weights);
                (key, hit)
            })
            .collect();

        keyed.sort_by(|(ka, a), (kb, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ka.cmp(kb))
        });

        keyed.into_iter().map(|(_, hit)| hit).collect()
    }

    /// Get unresponsive engines
    pub fn get_unresponsive(&self) -> &[UnresponsiveEngine] {
        &self.unresponsive_engines
    }

    /// Get timings
    pub fn get_timings(&self) -> &[Timing] {
        &self.timings
    }

    /// Get total result count
    pub fn result_count(&self) -> usize {
        self.results_map.len()
    }

    /// Get number of engines that returned results
    pub fn engine_count(&self) -> usize {
        self.results_map
            .values()
            .flat_map(|r| r.engines.iter())
            .collect::<HashSet<_>>()
            .len()
    }
}
