//! Wikipedia search engine implementation

use super::traits::*;
use crate::network::{HttpRequest, HttpResponse};
use crate::results::SearchHit;
use anyhow::Result as AnyhowResult;

/// Snippets are cut to this many characters
const MAX_SNIPPET_CHARS: usize = 500;

/// Wikipedia search through the MediaWiki API
pub struct Wikipedia {
    api_url: String,
    default_lang: String,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self {
            api_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            default_lang: "en".to_string(),
        }
    }

    fn get_api_url(&self, lang: &str) -> String {
        let lang = if lang == "all" || lang.is_empty() {
            &self.default_lang
        } else {
            // Extract base language code (e.g., "en" from "en-US")
            lang.split('-').next().unwrap_or(&self.default_lang)
        };
        self.api_url.replace("{lang}", lang)
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Wikipedia {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.wikipedia.org")
            .official_api(true)
            .results_format("JSON")
    }

    fn weight(&self) -> f64 {
        0.8
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<HttpRequest> {
        let limit = params.max_results.clamp(1, 50).to_string();

        Ok(HttpRequest::get(self.get_api_url(&params.lang))
            .header("Accept", "application/json")
            .param("action", "query")
            .param("format", "json")
            .param("generator", "search")
            .param("gsrsearch", params.query.clone())
            .param("gsrlimit", limit.clone())
            .param("prop", "extracts|info")
            .param("exintro", "1")
            .param("explaintext", "1")
            .param("exlimit", limit)
            .param("inprop", "url"))
    }

    fn response(&self, response: HttpResponse) -> AnyhowResult<EngineResults> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = serde_json::from_str(&response.text)?;
        let mut engine_results = EngineResults::new();

        if let Some(pages) = json
            .get("query")
            .and_then(|q| q.get("pages"))
            .and_then(|p| p.as_object())
        {
            // Sort by index to maintain search relevance order
            let mut page_list: Vec<_> = pages.values().collect();
            page_list.sort_by_key(|page| page.get("index").and_then(|i| i.as_i64()).unwrap_or(999));

            let mut position = 1u32;
            for page in page_list {
                let title = page.get("title").and_then(|t| t.as_str()).unwrap_or_default();
                let url = page.get("fullurl").and_then(|u| u.as_str()).unwrap_or_default();

                if title.is_empty() || url.is_empty() {
                    continue;
                }

                let snippet: String = page
                    .get("extract")
                    .and_then(|e| e.as_str())
                    .map(|s| s.chars().take(MAX_SNIPPET_CHARS).collect())
                    .unwrap_or_default();

                engine_results.add_result(
                    SearchHit::new(url, title, self.name())
                        .with_snippet(snippet)
                        .with_position(position),
                );
                position += 1;
            }
        }

        Ok(engine_results)
    }
}
