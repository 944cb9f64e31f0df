//! Meta-search: fans a query out to every loaded engine and merges the hits

use super::traits::SearchProvider;
use crate::config::SearchSettings;
use crate::engines::{Engine, EngineRegistry, RequestParams};
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::results::{EngineError, ResultContainer, SearchHit, Timing};
use async_trait::async_trait;
use futures::future::join_all;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use moka::future::Cache;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// What one engine contributed to a search
enum EngineOutcome {
    Results(Vec<SearchHit>, Timing),
    Failed(String, EngineError),
}

/// Search provider backed by the configured engines
pub struct MetaSearch {
    /// HTTP client for making requests
    client: HttpClient,
    /// Engine registry
    registry: Arc<EngineRegistry>,
    /// Default per-engine timeout
    default_timeout: Duration,
    /// Maximum per-engine timeout
    max_timeout: Duration,
    /// Engines temporarily taken out of rotation after a failure
    suspended: Cache<String, EngineError>,
    /// Suspension length, zero disables suspension
    ban_time: Duration,
    /// Paces outgoing searches
    limiter: Option<DefaultDirectRateLimiter>,
    /// Interval between paced searches
    pace: Duration,
}

impl MetaSearch {
    /// Create a new meta-search over `registry`
    pub fn new(client: HttpClient, registry: Arc<EngineRegistry>) -> Self {
        Self {
            client,
            registry,
            default_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            max_timeout: Duration::from_secs(crate::MAX_TIMEOUT),
            suspended: Cache::builder().max_capacity(256).build(),
            ban_time: Duration::ZERO,
            limiter: None,
            pace: Duration::ZERO,
        }
    }

    /// Create from settings
    pub fn with_settings(
        client: HttpClient,
        registry: Arc<EngineRegistry>,
        settings: &SearchSettings,
    ) -> Self {
        Self::new(client, registry)
            .with_timeout(Duration::from_secs_f64(settings.timeout))
            .with_ban_time(Duration::from_secs(settings.ban_time_on_fail))
            .with_rate_limit(settings.requests_per_second)
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Suspend failing engines for `ban_time`
    pub fn with_ban_time(mut self, ban_time: Duration) -> Self {
        self.ban_time = ban_time;
        if !ban_time.is_zero() {
            self.suspended = Cache::builder()
                .max_capacity(256)
                .time_to_live(ban_time)
                .build();
        }
        self
    }

    /// Allow at most `per_second` searches per second (zero disables pacing)
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = NonZeroU32::new(per_second).map(|n| RateLimiter::direct(Quota::per_second(n)));
        self.pace = match per_second {
            0 => Duration::ZERO,
            n => Duration::from_secs(1) / n,
        };
        self
    }

    /// Effective timeout of one engine
    fn engine_timeout(&self, name: &str) -> Duration {
        Duration::from_secs_f64(
            self.registry
                .get_timeout(name, self.default_timeout.as_secs_f64())
                .min(self.max_timeout.as_secs_f64()),
        )
    }

    /// Whether an engine is currently suspended
    pub fn is_suspended(&self, engine: &str) -> bool {
        self.suspended.contains_key(engine)
    }

    /// Execute a query across all engines that are not suspended
    pub async fn execute(&self, query: &str, max_results: usize) -> ResultContainer {
        let mut container = ResultContainer::with_weights(self.registry.weights());

        if query.trim().is_empty() {
            return container;
        }

        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }

        let params = RequestParams::new(query).with_max_results(max_results);
        let futures: Vec<_> = self
            .registry
            .all()
            .iter()
            .filter(|engine| {
                let suspended = self.is_suspended(engine.name());
                if suspended {
                    debug!("Skipping suspended engine {}", engine.name());
                }
                !suspended
            })
            .map(|engine| self.search_engine(engine.clone(), &params))
            .collect();

        info!("Executing search '{}' on {} engines", query, futures.len());

        for outcome in join_all(futures).await {
            match outcome {
                EngineOutcome::Results(hits, timing) => {
                    container.extend_results(hits);
                    container.add_timing(timing);
                }
                EngineOutcome::Failed(name, error) => {
                    if error.suspends() && !self.ban_time.is_zero() {
                        warn!("Suspending engine {} for {:?}: {}", name, self.ban_time, error);
                        self.suspended.insert(name.clone(), error.clone()).await;
                    }
                    container.add_unresponsive(name, error);
                }
            }
        }

        container
    }

    /// Search a single engine
    async fn search_engine(&self, engine: Arc<dyn Engine>, params: &RequestParams) -> EngineOutcome {
        let engine_name = engine.name().to_string();
        let start = Instant::now();

        let engine_timeout = self.engine_timeout(&engine_name);

        debug!("Searching engine {} with timeout {:?}", engine_name, engine_timeout);

        let request = match engine.request(params) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to build request for {}: {}", engine_name, e);
                return EngineOutcome::Failed(engine_name, EngineError::Unknown);
            }
        };

        let result = timeout(
            engine_timeout,
            self.client.execute_with_timeout(request, engine_timeout),
        )
        .await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(response)) => {
                if response.is_rate_limited() {
                    return EngineOutcome::Failed(engine_name, EngineError::TooManyRequests);
                }
                if response.status == 403 {
                    return EngineOutcome::Failed(engine_name, EngineError::AccessDenied);
                }
                let status = response.status;
                match engine.response(response) {
                    Ok(engine_results) => {
                        let result_count = engine_results.results.len();
                        debug!(
                            "Engine {} returned {} results in {:?}",
                            engine_name, result_count, elapsed
                        );
                        let timing = Timing {
                            engine: engine_name,
                            time_ms: elapsed.as_millis() as u64,
                            result_count,
                        };
                        EngineOutcome::Results(engine_results.results, timing)
                    }
                    Err(e) => {
                        warn!("Failed to parse response from {}: {}", engine_name, e);
                        let error = if e.to_string().contains("CAPTCHA") {
                            EngineError::Captcha
                        } else if !(200..300).contains(&status) {
                            EngineError::HttpError(status)
                        } else {
                            EngineError::ParseError
                        };
                        EngineOutcome::Failed(engine_name, error)
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("Request failed for {}: {}", engine_name, e);
                let error = match e {
                    ProviderError::Timeout => EngineError::Timeout,
                    ProviderError::Http { status: 429 } => EngineError::TooManyRequests,
                    ProviderError::Http { status: 403 } => EngineError::AccessDenied,
                    ProviderError::Http { status } => EngineError::HttpError(status),
                    _ => EngineError::NetworkError,
                };
                EngineOutcome::Failed(engine_name, error)
            }
            Err(_) => {
                warn!("Timeout for engine {}", engine_name);
                EngineOutcome::Failed(engine_name, EngineError::Timeout)
            }
        }
    }
}

#[async_trait]
impl SearchProvider for MetaSearch {
    fn name(&self) -> &str {
        "metasearch"
    }

    /// Slowest engine timeout plus one pacing interval
    fn deadline(&self) -> Option<Duration> {
        let slowest = self
            .registry
            .all()
            .iter()
            .map(|engine| self.engine_timeout(engine.name()))
            .max()
            .unwrap_or_default();
        Some(slowest + self.pace)
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let container = self.execute(query, max_results).await;

        // no engine answered at all: failed, suspended, or none loaded
        if container.get_timings().is_empty() {
            let failures = container
                .get_unresponsive()
                .iter()
                .map(|e| format!("{}: {}", e.name, e.error))
                .collect::<Vec<_>>();
            if failures.is_empty() && !self.registry.is_empty() {
                return Err(ProviderError::Suspended(self.registry.names().join(", ")));
            }
            let reason = if failures.is_empty() {
                "no engine available".to_string()
            } else {
                failures.join(", ")
            };
            return Err(ProviderError::Unavailable(reason));
        }

        Ok(container
            .get_ordered_results()
            .into_iter()
            .take(max_results)
            .collect())
    }
}
