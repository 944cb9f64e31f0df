//! Brave search engine implementation

use super::traits::*;
use crate::network::{HttpRequest, HttpResponse};
use crate::results::SearchHit;
use anyhow::Result as AnyhowResult;
use scraper::Html;

/// Brave web search
pub struct Brave {
    base_url: String,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            base_url: "https://search.brave.com/search".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> AnyhowResult<Vec<SearchHit>> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = selector("div.snippet")?;
        let title_selector = selector("a.result-header, a.heading-serpresult, a")?;
        let snippet_selector = selector("p.snippet-description, div.snippet-description")?;

        let mut position = 1u32;

        for element in document.select(&result_selector) {
            let title_elem = match element.select(&title_selector).next() {
                Some(t) => t,
                None => continue,
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            let url = title_elem
                .value()
                .attr("href")
                .map(|h| h.to_string())
                .unwrap_or_default();

            if url.is_empty() || url.starts_with('/') {
                continue;
            }

            let snippet = element
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            results.push(
                SearchHit::new(url, title, self.name())
                    .with_snippet(snippet)
                    .with_position(position),
            );
            position += 1;
        }

        Ok(results)
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://search.brave.com")
            .official_api(false)
            .results_format("HTML")
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<HttpRequest> {
        Ok(HttpRequest::get(&self.base_url)
            .param("q", params.query.clone())
            .param("source", "web"))
    }

    fn response(&self, response: HttpResponse) -> AnyhowResult<EngineResults> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let results = self.parse_results(&response.text)?;
        Ok(EngineResults::with_results(results))
    }
}
