//! Settings structures for deep-research configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure matching `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub research: ResearchSettings,
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub fetch: FetchSettings,
    pub outgoing: OutgoingSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    ///
    /// `OPENAI_API_KEY` and `OPENAI_MODEL_NAME` are honoured for compatibility;
    /// the `DEEP_RESEARCH_*` variants win when both are set.
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.llm.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_LLM_API_KEY") {
            self.llm.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("OPENAI_MODEL_NAME") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_LLM_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_LLM_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                self.research.max_depth = depth;
            }
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_MAX_QUERIES") {
            if let Ok(n) = val.parse() {
                self.research.max_queries_total = n;
            }
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }

        self.apply_google_credentials(
            std::env::var("GOOGLE_API_KEY").ok(),
            std::env::var("GOOGLE_CSE_ID").ok(),
        );
    }

    /// Copy Google Custom Search credentials into every Google engine
    ///
    /// An engine holding both an API key and a search engine id afterwards
    /// is enabled.
    pub fn apply_google_credentials(&mut self, api_key: Option<String>, cx: Option<String>) {
        if api_key.is_none() && cx.is_none() {
            return;
        }
        for engine in self.search.engines.iter_mut().filter(|e| e.engine == "google") {
            if let Some(ref key) = api_key {
                engine.api_key = Some(key.clone());
            }
            if let Some(ref cx) = cx {
                engine
                    .extra
                    .insert("cx".to_string(), serde_yaml::Value::String(cx.clone()));
            }
            let has_key = engine.api_key.as_deref().is_some_and(|k| !k.is_empty());
            let has_cx = engine.extra_str("cx").is_some_and(|c| !c.is_empty());
            if has_key && has_cx {
                engine.disabled = false;
            }
        }
    }

    /// Get engine config by name
    pub fn get_engine(&self, name: &str) -> Option<&EngineConfig> {
        self.search.engines.iter().find(|e| e.name == name)
    }

    /// Get all enabled engines
    pub fn enabled_engines(&self) -> Vec<&EngineConfig> {
        self.search.engines.iter().filter(|e| !e.disabled).collect()
    }
}

/// Bounds and knobs of the research loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Deepest follow-up level that may be dispatched (seed is depth 0)
    pub max_depth: u32,
    /// Hard stop on dispatched queries
    pub max_queries_total: usize,
    /// Candidate URLs considered per query
    pub max_sources_per_query: usize,
    /// Hard stop on processed sources
    pub max_total_sources: usize,
    /// Follow-up queries kept per source
    pub max_proposed_queries: usize,
    /// Per-URL pipelines run at once within one dispatched query
    pub max_concurrent_sources: usize,
    /// Character budget for prior context embedded in analysis prompts
    pub context_window_chars: usize,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_queries_total: 10,
            max_sources_per_query: 3,
            max_total_sources: 20,
            max_proposed_queries: 3,
            max_concurrent_sources: 1,
            context_window_chars: 12_000,
        }
    }
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// API key (usually injected from the environment)
    pub api_key: Option<String>,
    /// Completion timeout in seconds
    pub timeout: f64,
    /// System prompt sent with every completion
    pub system_prompt: String,
    /// Sampling temperature (omitted from the request when unset)
    pub temperature: Option<f32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "o3-mini".to_string(),
            api_key: None,
            timeout: 60.0,
            system_prompt: "You are a helpful research assistant.".to_string(),
            temperature: None,
        }
    }
}

/// Web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engines queried for every research query
    pub engines: Vec<EngineConfig>,
    /// Time to suspend an engine after a failure (seconds)
    pub ban_time_on_fail: u64,
    /// Outgoing search requests allowed per second
    pub requests_per_second: u32,
    /// Default per-engine timeout in seconds, also the search deadline for
    /// providers that do not declare their own
    pub timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engines: default_engines(),
            ban_time_on_fail: 60,
            requests_per_second: 1,
            timeout: 10.0,
        }
    }
}

/// Page fetch and extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Extraction heuristic
    pub extractor: ExtractorKind,
    /// Fetch timeout in seconds
    pub timeout: f64,
    /// Extracted text is truncated to this many characters
    pub max_content_chars: usize,
    /// Extracted text shorter than this counts as no content
    pub min_content_chars: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::default(),
            timeout: 20.0,
            max_content_chars: 20_000,
            min_content_chars: 1,
        }
    }
}

/// Available text extraction heuristics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Prefer `<article>`/`<main>` regions, fall back to the cleaned body
    #[default]
    Readability,
    /// Strip noisy tags from the whole document
    TagStrip,
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
    /// Retries for transient failures (timeouts, 5xx, 429)
    pub retries: u32,
    /// Initial retry backoff in milliseconds, doubled on each attempt
    pub retry_backoff_ms: u64,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
            retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// HTTP surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Individual engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine name (unique identifier)
    pub name: String,
    /// Engine module to use
    pub engine: String,
    /// Whether engine is disabled
    pub disabled: bool,
    /// Custom timeout for this engine
    pub timeout: Option<f64>,
    /// Engine weight for ranking (engine default when unset)
    pub weight: Option<f64>,
    /// API key if required
    pub api_key: Option<String>,
    /// Additional engine-specific settings
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl EngineConfig {
    /// Look up an engine-specific string setting
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            engine: String::new(),
            disabled: false,
            timeout: None,
            weight: None,
            api_key: None,
            extra: HashMap::new(),
        }
    }
}

/// Default engine configurations
///
/// Google needs credentials and stays disabled until they are supplied.
fn default_engines() -> Vec<EngineConfig> {
    vec![
        EngineConfig {
            name: "google".to_string(),
            engine: "google".to_string(),
            disabled: true,
            ..Default::default()
        },
        EngineConfig {
            name: "duckduckgo".to_string(),
            engine: "duckduckgo".to_string(),
            ..Default::default()
        },
        EngineConfig {
            name: "brave".to_string(),
            engine: "brave".to_string(),
            ..Default::default()
        },
        EngineConfig {
            name: "wikipedia".to_string(),
            engine: "wikipedia".to_string(),
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.research.max_depth, 2);
        assert_eq!(settings.research.max_proposed_queries, 3);
        assert_eq!(settings.llm.model, "o3-mini");
        assert!(settings.llm.api_key.is_none());
        assert!(!settings.enabled_engines().is_empty());
    }

    #[test]
    fn test_engine_lookup() {
        let settings = Settings::default();
        let google = settings.get_engine("google");
        assert!(google.is_some());
        assert!(google.unwrap().disabled);
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
research:
  max_depth: 1
  max_total_sources: 5
fetch:
  extractor: tag_strip
search:
  engines:
    - name: google
      engine: google
      api_key: key
      cx: engine-id
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.research.max_depth, 1);
        assert_eq!(settings.research.max_total_sources, 5);
        // untouched fields keep their defaults
        assert_eq!(settings.research.max_queries_total, 10);
        assert_eq!(settings.fetch.extractor, ExtractorKind::TagStrip);

        let google = settings.get_engine("google").unwrap();
        assert_eq!(google.api_key.as_deref(), Some("key"));
        assert_eq!(google.extra_str("cx"), Some("engine-id"));
    }

    #[test]
    fn test_google_credentials_enable_engine() {
        let mut settings = Settings::default();
        settings.apply_google_credentials(Some("key".to_string()), Some("cse".to_string()));

        let google = settings.get_engine("google").unwrap();
        assert!(!google.disabled);
        assert_eq!(google.api_key.as_deref(), Some("key"));
        assert_eq!(google.extra_str("cx"), Some("cse"));
        assert!(settings.enabled_engines().iter().any(|e| e.engine == "google"));
    }

    #[test]
    fn test_partial_google_credentials_keep_engine_disabled() {
        let mut settings = Settings::default();
        settings.apply_google_credentials(Some("key".to_string()), None);

        let google = settings.get_engine("google").unwrap();
        assert!(google.disabled);
        assert_eq!(google.api_key.as_deref(), Some("key"));

        // the missing half arriving later completes the pair
        settings.apply_google_credentials(None, Some("cse".to_string()));
        assert!(!settings.get_engine("google").unwrap().disabled);
    }
}
