//! Google Custom Search engine implementation

use super::traits::*;
use crate::config::{ConfigError, EngineConfig};
use crate::network::{HttpRequest, HttpResponse};
use crate::results::SearchHit;
use anyhow::Result as AnyhowResult;
use serde::Deserialize;

/// The API returns at most this many items per request
const MAX_NUM: usize = 10;

/// Google web search through the Custom Search JSON API
pub struct Google {
    base_url: String,
    api_key: Option<String>,
    cx: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
    #[serde(rename = "searchInformation")]
    search_information: Option<CseSearchInformation>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CseSearchInformation {
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

impl Google {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: None,
            cx: None,
        }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.google.com")
            .official_api(true)
            .api_key_required(true)
            .results_format("JSON")
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<HttpRequest> {
        let (Some(key), Some(cx)) = (self.api_key.as_ref(), self.cx.as_ref()) else {
            return Err(ConfigError::MissingCredential("google api_key and cx".to_string()).into());
        };

        let num = params.max_results.clamp(1, MAX_NUM);
        Ok(HttpRequest::get(&self.base_url)
            .header("Accept", "application/json")
            .param("q", params.query.clone())
            .param("key", key.clone())
            .param("cx", cx.clone())
            .param("num", num.to_string()))
    }

    fn response(&self, response: HttpResponse) -> AnyhowResult<EngineResults> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let parsed: CseResponse = response.json()?;
        let mut engine_results = EngineResults::new();
        engine_results.number_of_results = parsed
            .search_information
            .and_then(|info| info.total_results)
            .and_then(|total| total.parse().ok());

        let mut position = 1u32;
        for item in parsed.items {
            let (Some(title), Some(link)) = (item.title, item.link) else {
                continue;
            };
            if link.is_empty() {
                continue;
            }

            let hit = SearchHit::new(link, title, self.name())
                .with_snippet(item.snippet.unwrap_or_default())
                .with_position(position);
            position += 1;
            engine_results.add_result(hit);
        }

        Ok(engine_results)
    }

    fn init(&mut self, config: &EngineConfig) -> AnyhowResult<()> {
        self.api_key = config.api_key.clone().filter(|k| !k.is_empty());
        self.cx = config.extra_str("cx").map(str::to_string).filter(|c| !c.is_empty());
        if let Some(base_url) = config.extra_str("base_url") {
            self.base_url = base_url.to_string();
        }
        Ok(())
    }

    fn validate(&self, _config: &EngineConfig) -> AnyhowResult<()> {
        if self.api_key.is_none() {
            return Err(ConfigError::MissingCredential("google api_key (GOOGLE_API_KEY)".to_string()).into());
        }
        if self.cx.is_none() {
            return Err(ConfigError::MissingCredential("google cx (GOOGLE_CSE_ID)".to_string()).into());
        }
        Ok(())
    }
}
