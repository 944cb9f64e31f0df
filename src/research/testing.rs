//! In-memory providers for exercising the research loop

use crate::error::ProviderError;
use crate::fetch::FetchExtractProvider;
use crate::llm::LlmProvider;
use crate::research::normalize_query;
use crate::results::SearchHit;
use crate::search::SearchProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn slug(query: &str) -> String {
    normalize_query(query)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Search that answers from a script, or with distinct URLs per query
#[derive(Clone, Default)]
pub struct ScriptedSearch {
    scripted: HashMap<String, Result<Vec<String>, ProviderError>>,
    per_query: usize,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self {
            per_query: 1,
            ..Default::default()
        }
    }

    /// Unscripted queries get `n` URLs each
    pub fn per_query(mut self, n: usize) -> Self {
        self.per_query = n;
        self
    }

    pub fn respond(mut self, query: &str, urls: &[&str]) -> Self {
        self.scripted.insert(
            normalize_query(query),
            Ok(urls.iter().map(|u| u.to_string()).collect()),
        );
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.scripted.insert(
            normalize_query(query),
            Err(ProviderError::Unavailable("scripted".to_string())),
        );
        self
    }

    /// Queries searched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.lock().unwrap().push(query.to_string());
        let urls = match self.scripted.get(&normalize_query(query)) {
            Some(scripted) => scripted.clone()?,
            None => (0..self.per_query)
                .map(|i| format!("https://example.com/{}/{}", slug(query), i))
                .collect(),
        };
        Ok(urls
            .into_iter()
            .take(max_results)
            .map(|url| SearchHit::new(url.clone(), url, "scripted"))
            .collect())
    }
}

/// Fetcher serving scripted pages; unscripted URLs get a stock page
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Option<String>>,
    delay: Option<Duration>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Some(body.to_string()));
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), None);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchExtractProvider for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.pages.get(url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(ProviderError::Http { status: 404 }),
            None => Ok(format!("content of {}", url)),
        }
    }

    fn extract(&self, raw: &str, _url: &str) -> Option<String> {
        let text = raw.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

type Reply = dyn Fn(&str, &str) -> Result<String, ProviderError> + Send + Sync;

/// LLM answering through a closure of (system prompt, user prompt)
#[derive(Clone)]
pub struct FnLlm {
    reply: Arc<Reply>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FnLlm {
    pub fn new(reply: impl Fn(&str, &str) -> Result<String, ProviderError> + Send + Sync + 'static) -> Self {
        Self {
            reply: Arc::new(reply),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// User prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FnLlm {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        (self.reply)(system_prompt, user_prompt)
    }
}
