//! The research loop

use super::models::*;
use super::processor::SourceProcessor;
use super::state::RunState;
use crate::config::{ConfigError, Settings};
use crate::engines::EngineLoader;
use crate::error::{ProviderError, ResearchError};
use crate::fetch::{FetchExtractProvider, HttpFetcher};
use crate::llm::{synthesis_prompt, LlmProvider, OpenAiProvider};
use crate::metrics::{RunMetrics, Stage};
use crate::network::HttpClient;
use crate::search::{MetaSearch, SearchProvider};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Slack on top of a search provider's own deadline
const SEARCH_GRACE: Duration = Duration::from_secs(1);

/// Runs bounded breadth-first research over the configured providers
#[derive(Clone)]
pub struct Researcher {
    search: Arc<dyn SearchProvider>,
    llm: Arc<dyn LlmProvider>,
    processor: SourceProcessor,
    budget: RunBudget,
    system_prompt: String,
    search_timeout: Duration,
    llm_timeout: Duration,
}

impl Researcher {
    /// Wire up a researcher from already built providers
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn FetchExtractProvider>,
        llm: Arc<dyn LlmProvider>,
        settings: &Settings,
    ) -> Self {
        let budget = RunBudget::from(&settings.research);
        let llm_timeout = Duration::from_secs_f64(settings.llm.timeout);
        let processor = SourceProcessor::new(fetcher, llm.clone())
            .with_system_prompt(settings.llm.system_prompt.clone())
            .with_timeouts(Duration::from_secs_f64(settings.fetch.timeout), llm_timeout)
            .with_max_proposed_queries(budget.max_proposed_queries);

        Self {
            search,
            llm,
            processor,
            budget,
            system_prompt: settings.llm.system_prompt.clone(),
            search_timeout: Duration::from_secs_f64(settings.search.timeout),
            llm_timeout,
        }
    }

    /// Build the HTTP-backed providers described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let registry = Arc::new(EngineLoader::load(&settings.search.engines)?);
        info!("Loaded {} search engines: {:?}", registry.len(), registry.names());

        let search = MetaSearch::with_settings(client.clone(), registry, &settings.search);
        let fetcher = HttpFetcher::new(client.clone(), &settings.fetch);
        let llm = OpenAiProvider::new(client, &settings.llm)?;

        Ok(Self::new(
            Arc::new(search),
            Arc::new(fetcher),
            Arc::new(llm),
            settings,
        ))
    }

    /// Replace the run bounds
    pub fn with_budget(mut self, budget: RunBudget) -> Self {
        self.processor = self
            .processor
            .with_max_proposed_queries(budget.max_proposed_queries);
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> &RunBudget {
        &self.budget
    }

    /// Research `question` until the frontier or a budget runs out, then
    /// synthesize an answer from everything collected
    pub async fn run(
        &self,
        question: &str,
        cancel: CancellationToken,
    ) -> Result<ResearchReport, ResearchError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("research", %run_id);
        self.run_inner(run_id, question, cancel).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        question: &str,
        cancel: CancellationToken,
    ) -> Result<ResearchReport, ResearchError> {
        let started_at = Utc::now();
        let metrics = RunMetrics::new();
        let mut state = RunState::new(question, self.budget.clone());
        info!("Starting research: {}", question.trim());

        let termination = loop {
            if cancel.is_cancelled() {
                info!("Research cancelled after {} queries", state.iterations_done);
                return Err(ResearchError::Cancelled {
                    context: state.context,
                });
            }
            if let Some(reason) = state.exhausted() {
                break reason;
            }
            let Some(query) = state.next_query() else {
                break TerminationReason::FrontierExhausted;
            };

            state.iterations_done += 1;
            metrics.inc_query();
            info!(
                "Dispatching query {}/{} (depth {}): {}",
                state.iterations_done, self.budget.max_queries_total, query.depth, query.text
            );

            let Some(hits) = self.search(&query, &metrics).await else {
                continue;
            };

            let mut urls = Vec::new();
            for hit in hits.into_iter().take(self.budget.max_sources_per_query) {
                if urls.len() >= state.remaining_sources() {
                    debug!("Source budget reached, ignoring remaining candidates");
                    break;
                }
                if state.claim_url(&hit.url) {
                    urls.push(hit.url);
                } else {
                    debug!("Skipping already visited {}", hit.url);
                    metrics.record_duplicate_url();
                }
            }
            state.sources_processed += urls.len();

            for chunk in urls.chunks(self.budget.max_concurrent_sources.max(1)) {
                let prior = state.context.render_window(self.budget.context_window_chars);
                let results = join_all(chunk.iter().map(|url| {
                    self.processor
                        .process(url, &query, prior.as_deref(), &cancel, &metrics)
                }))
                .await;

                let mut cancelled = false;
                for result in results {
                    match result {
                        Some(result) => {
                            if !result.is_ok() {
                                debug!("Skipping {} ({})", result.url, result.status);
                            }
                            state.merge(&query, result, &metrics);
                        }
                        None => cancelled = true,
                    }
                }
                if cancelled {
                    info!("Research cancelled while processing sources");
                    return Err(ResearchError::Cancelled {
                        context: state.context,
                    });
                }
            }
        };

        info!(
            "Research loop finished ({:?}): {} queries, {} sources, {} summaries, {} queries left",
            termination,
            state.iterations_done,
            state.sources_processed,
            state.context.len(),
            state.frontier_len()
        );

        let answer = if state.context.is_empty() {
            warn!("No summaries collected, skipping synthesis");
            Answer::InsufficientEvidence
        } else {
            match self.synthesize(question, &state, &cancel, &metrics).await {
                Ok(text) => Answer::Synthesized(text),
                Err(None) => {
                    return Err(ResearchError::Cancelled {
                        context: state.context,
                    })
                }
                Err(Some(source)) => {
                    warn!("Synthesis failed: {}", source);
                    return Err(ResearchError::SynthesisFailed {
                        source,
                        context: state.context,
                    });
                }
            }
        };

        Ok(ResearchReport {
            run_id,
            question: question.trim().to_string(),
            answer,
            context: state.context,
            termination,
            stats: metrics.snapshot(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Search one query; `None` when the search failed
    async fn search(
        &self,
        query: &ResearchQuery,
        metrics: &RunMetrics,
    ) -> Option<Vec<crate::results::SearchHit>> {
        // a provider that bounds its own backends gets to finish them
        let limit = self
            .search
            .deadline()
            .map(|deadline| deadline + SEARCH_GRACE)
            .unwrap_or(self.search_timeout);

        let start = Instant::now();
        let result = timeout(
            limit,
            self.search.search(&query.text, self.budget.max_sources_per_query),
        )
        .await;
        metrics.record_latency(Stage::Search, start.elapsed());

        match result {
            Ok(Ok(hits)) => {
                debug!("{} returned {} hits", self.search.name(), hits.len());
                Some(hits)
            }
            Ok(Err(e)) => {
                warn!("Search failed for '{}': {}", query.text, e);
                metrics.record_search_failure();
                None
            }
            Err(_) => {
                warn!("Search timed out after {:?} for '{}'", limit, query.text);
                metrics.record_search_failure();
                None
            }
        }
    }

    /// Final completion; `Err(None)` when cancelled
    async fn synthesize(
        &self,
        question: &str,
        state: &RunState,
        cancel: &CancellationToken,
        metrics: &RunMetrics,
    ) -> Result<String, Option<ProviderError>> {
        let prompt = synthesis_prompt(question.trim(), &state.context.render());
        info!(
            "Synthesizing answer from {} summaries with {}",
            state.context.len(),
            self.llm.model_name()
        );

        let start = Instant::now();
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(None),
            result = timeout(self.llm_timeout, self.llm.complete(&self.system_prompt, &prompt)) => result,
        };
        metrics.record_latency(Stage::Llm, start.elapsed());

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Some(e)),
            Err(_) => Err(Some(ProviderError::Timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResearchSettings;
    use crate::llm::NO_CONTEXT_MARKER;
    use crate::research::testing::{FnLlm, ScriptedFetcher, ScriptedSearch};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SEED: &str = "What is photosynthesis?";

    fn researcher(
        search: &ScriptedSearch,
        fetcher: &ScriptedFetcher,
        llm: &FnLlm,
        research: ResearchSettings,
    ) -> Researcher {
        let settings = Settings {
            research,
            ..Default::default()
        };
        Researcher::new(
            Arc::new(search.clone()),
            Arc::new(fetcher.clone()),
            Arc::new(llm.clone()),
            &settings,
        )
    }

    fn is_synthesis(prompt: &str) -> bool {
        prompt.contains("Collected summaries:")
    }

    /// Query an analysis prompt is about
    fn analyzed_query(prompt: &str) -> String {
        let marker = "working on the query: \"";
        let start = prompt.find(marker).map(|i| i + marker.len()).unwrap_or(0);
        let end = prompt[start..].find("\".").map(|i| start + i).unwrap_or(start);
        prompt[start..end].to_string()
    }

    fn reply(summary: &str, queries: &[&str]) -> String {
        serde_json::json!({"summary": summary, "queries": queries}).to_string()
    }

    /// Every source summarizes its query and proposes nothing
    fn quiet_llm() -> FnLlm {
        FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                Ok("final answer".to_string())
            } else {
                Ok(reply(&format!("summary of {}", analyzed_query(prompt)), &[]))
            }
        })
    }

    /// Every source proposes three never-seen-before queries
    fn endless_llm() -> FnLlm {
        let counter = Arc::new(AtomicUsize::new(0));
        FnLlm::new(move |_, prompt| {
            if is_synthesis(prompt) {
                return Ok("final answer".to_string());
            }
            let n = counter.fetch_add(3, Ordering::SeqCst);
            let queries: Vec<String> = (n..n + 3).map(|i| format!("topic {}", i)).collect();
            let queries: Vec<&str> = queries.iter().map(String::as_str).collect();
            Ok(reply("more", &queries))
        })
    }

    fn settings(max_depth: u32) -> ResearchSettings {
        ResearchSettings {
            max_depth,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_photosynthesis_two_levels() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                return Ok("Photosynthesis turns light into chemical energy.".to_string());
            }
            let query = analyzed_query(prompt);
            if query == SEED {
                Ok(format!("```json\n{}\n```", reply("Seed summary", &["q1", "q2"])))
            } else {
                Ok(reply(&format!("Summary for {}", query), &[&format!("more about {}", query)]))
            }
        });

        let report = researcher(&search, &fetcher, &llm, settings(1))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls(), vec![SEED, "q1", "q2"]);
        assert_eq!(fetcher.fetched().len(), 3);
        assert_eq!(report.context.len(), 3);
        assert_eq!(report.termination, TerminationReason::FrontierExhausted);
        assert_eq!(
            report.answer,
            Answer::Synthesized("Photosynthesis turns light into chemical energy.".to_string())
        );

        let summaries: Vec<&str> = report.context.entries().iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Seed summary", "Summary for q1", "Summary for q2"]);
        assert_eq!(report.context.entries()[1].query, "q1");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains(NO_CONTEXT_MARKER));
        assert!(prompts[1].contains("Seed summary"));
        let synthesis = &prompts[3];
        assert!(is_synthesis(synthesis));
        for summary in summaries {
            assert!(synthesis.contains(summary));
        }

        assert_eq!(report.stats.queries_dispatched, 3);
        assert_eq!(report.stats.queries_beyond_depth, 2);
        assert_eq!(report.stats.sources_ok, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_insufficient_evidence() {
        let search = ScriptedSearch::new().respond(SEED, &["https://a.com/photo"]);
        let fetcher = ScriptedFetcher::new().fail("https://a.com/photo");
        let llm = quiet_llm();

        let report = researcher(&search, &fetcher, &llm, settings(1))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert!(report.context.is_empty());
        assert_eq!(report.answer, Answer::InsufficientEvidence);
        assert!(llm.prompts().is_empty());
        assert_eq!(report.stats.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_adds_nothing() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                Ok("unused".to_string())
            } else {
                Ok("{summary: \"plants\", queries: [\"q1\"]}".to_string())
            }
        });

        let report = researcher(&search, &fetcher, &llm, settings(2))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls(), vec![SEED]);
        assert!(report.context.is_empty());
        assert_eq!(report.answer, Answer::InsufficientEvidence);
        assert_eq!(report.stats.analysis_failures, 1);
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_same_url_in_one_round_is_fetched_once() {
        let search = ScriptedSearch::new().respond(
            SEED,
            &[
                "https://a.com/x",
                "https://a.com/x/?utm_source=feed",
                "https://b.com/y",
            ],
        );
        let fetcher = ScriptedFetcher::new();

        let report = researcher(&search, &fetcher, &quiet_llm(), settings(1))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher.fetched(), vec!["https://a.com/x", "https://b.com/y"]);
        assert_eq!(report.stats.duplicate_urls, 1);
        assert_eq!(report.context.len(), 2);
    }

    #[tokio::test]
    async fn test_url_is_never_fetched_twice_across_queries() {
        let search = ScriptedSearch::new()
            .respond(SEED, &["https://a.com"])
            .respond("q1", &["https://a.com#section"]);
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                Ok("answer".to_string())
            } else {
                Ok(reply("s", &["q1"]))
            }
        });

        let report = researcher(&search, &fetcher, &llm, settings(2))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls(), vec![SEED, "q1"]);
        assert_eq!(fetcher.fetched(), vec!["https://a.com"]);
        assert_eq!(report.context.len(), 1);
    }

    #[tokio::test]
    async fn test_query_is_never_dispatched_twice() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                Ok("answer".to_string())
            } else {
                Ok(reply("s", &["WHAT IS  photosynthesis?", "q1", " Q1 "]))
            }
        });

        let report = researcher(&search, &fetcher, &llm, settings(3))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls(), vec![SEED, "q1"]);
        assert_eq!(report.stats.duplicate_queries, 5);
    }

    #[tokio::test]
    async fn test_depth_zero_only_searches_seed() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();

        let report = researcher(&search, &fetcher, &endless_llm(), settings(0))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls(), vec![SEED]);
        assert_eq!(report.stats.queries_beyond_depth, 3);
        assert_eq!(report.termination, TerminationReason::FrontierExhausted);
    }

    #[tokio::test]
    async fn test_terminates_on_query_budget() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let research = ResearchSettings {
            max_depth: 100,
            max_queries_total: 5,
            max_total_sources: 1_000,
            ..Default::default()
        };

        let report = researcher(&search, &fetcher, &endless_llm(), research)
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(search.calls().len(), 5);
        assert_eq!(report.termination, TerminationReason::QueryBudgetExhausted);
        assert_eq!(report.context.len(), 5);
        assert!(report.answer.text().is_some());
    }

    #[tokio::test]
    async fn test_terminates_on_source_budget() {
        let search = ScriptedSearch::new().per_query(3);
        let fetcher = ScriptedFetcher::new();
        let research = ResearchSettings {
            max_depth: 100,
            max_queries_total: 100,
            max_total_sources: 4,
            ..Default::default()
        };

        let report = researcher(&search, &fetcher, &endless_llm(), research)
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher.fetched().len(), 4);
        assert_eq!(search.calls().len(), 2);
        assert_eq!(report.termination, TerminationReason::SourceBudgetExhausted);
    }

    #[tokio::test]
    async fn test_proposal_cap_and_query_budget_interaction() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                return Ok("answer".to_string());
            }
            if analyzed_query(prompt) == SEED {
                Ok(reply("seed", &["a", "b", "c", "d", "e"]))
            } else {
                Ok(reply("leaf", &[]))
            }
        });
        let research = ResearchSettings {
            max_depth: 2,
            max_queries_total: 2,
            ..Default::default()
        };

        let report = researcher(&search, &fetcher, &llm, research)
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        // only three proposals survive the per-source cap, and the query
        // budget stops the run after the first of them
        assert_eq!(report.stats.queries_enqueued, 3);
        assert_eq!(search.calls(), vec![SEED, "a"]);
        assert_eq!(report.termination, TerminationReason::QueryBudgetExhausted);
    }

    #[tokio::test]
    async fn test_search_failure_skips_query() {
        let search = ScriptedSearch::new().fail(SEED);
        let fetcher = ScriptedFetcher::new();
        let llm = quiet_llm();

        let report = researcher(&search, &fetcher, &llm, settings(1))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.stats.queries_dispatched, 1);
        assert_eq!(report.stats.search_failures, 1);
        assert_eq!(report.answer, Answer::InsufficientEvidence);
        assert!(fetcher.fetched().is_empty());
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_failed_sources_never_reach_context() {
        let search = ScriptedSearch::new().respond(SEED, &["https://a.com", "https://b.com", "https://c.com"]);
        let fetcher = ScriptedFetcher::new().fail("https://b.com");

        let report = researcher(&search, &fetcher, &quiet_llm(), settings(0))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        let urls: Vec<&str> = report.context.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://c.com"]);
        assert_eq!(report.stats.sources_processed, 3);
        assert_eq!(report.stats.sources_ok, 2);
    }

    #[tokio::test]
    async fn test_concurrent_sources_merge_in_search_order() {
        let search = ScriptedSearch::new().respond(SEED, &["https://a.com", "https://b.com", "https://c.com"]);
        let fetcher = ScriptedFetcher::new();
        let llm = quiet_llm();
        let research = ResearchSettings {
            max_depth: 0,
            max_concurrent_sources: 3,
            ..Default::default()
        };

        let report = researcher(&search, &fetcher, &llm, research)
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        let urls: Vec<&str> = report.context.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://b.com", "https://c.com"]);
        // sources of one batch all see the context as it was before the batch
        let prompts = llm.prompts();
        assert!(prompts[..3].iter().all(|p| p.contains(NO_CONTEXT_MARKER)));
    }

    #[tokio::test]
    async fn test_synthesis_failure_keeps_context() {
        let search = ScriptedSearch::new();
        let fetcher = ScriptedFetcher::new();
        let llm = FnLlm::new(|_, prompt| {
            if is_synthesis(prompt) {
                Err(ProviderError::Http { status: 500 })
            } else {
                Ok(reply("only finding", &[]))
            }
        });

        let err = researcher(&search, &fetcher, &llm, settings(0))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ResearchError::SynthesisFailed { source, context } => {
                assert_eq!(source, ProviderError::Http { status: 500 });
                assert_eq!(context.len(), 1);
                assert_eq!(context.entries()[0].summary, "only finding");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let search = ScriptedSearch::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = researcher(&search, &ScriptedFetcher::new(), &quiet_llm(), settings(1))
            .run(SEED, cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ResearchError::Cancelled { .. }));
        assert!(err.context().is_empty());
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_mid_run_skips_synthesis() {
        let search = ScriptedSearch::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let llm = FnLlm::new(move |_, prompt| {
            if is_synthesis(prompt) {
                return Ok("unused".to_string());
            }
            trigger.cancel();
            Ok(reply("first finding", &["q1"]))
        });

        let err = researcher(&search, &ScriptedFetcher::new(), &llm, settings(2))
            .run(SEED, cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ResearchError::Cancelled { .. }));
        assert_eq!(err.context().len(), 1);
        assert_eq!(search.calls(), vec![SEED]);
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let report = researcher(&ScriptedSearch::new(), &ScriptedFetcher::new(), &quiet_llm(), settings(0))
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["question"], SEED);
        assert_eq!(json["answer"]["kind"], "synthesized");
        assert_eq!(json["termination"], "frontier_exhausted");
        assert_eq!(json["context"][0]["query"], SEED);
        assert_eq!(json["stats"]["queries_dispatched"], 1);
    }

    #[tokio::test]
    async fn test_with_budget_overrides_settings() {
        let search = ScriptedSearch::new();
        let budget = RunBudget {
            max_queries_total: 0,
            ..Default::default()
        };
        let report = researcher(&search, &ScriptedFetcher::new(), &quiet_llm(), settings(2))
            .with_budget(budget)
            .run(SEED, CancellationToken::new())
            .await
            .unwrap();

        assert!(search.calls().is_empty());
        assert_eq!(report.termination, TerminationReason::QueryBudgetExhausted);
        assert_eq!(report.answer, Answer::InsufficientEvidence);
    }
}
