//! DuckDuckGo search engine implementation

use super::traits::*;
use crate::network::{HttpRequest, HttpResponse};
use crate::results::SearchHit;
use anyhow::Result as AnyhowResult;
use scraper::Html;
use std::collections::HashMap;

/// DuckDuckGo HTML web search (no API key required)
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            html_url: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    fn parse_html_results(&self, html: &str) -> AnyhowResult<Vec<SearchHit>> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = selector("div.result")?;
        let title_selector = selector("a.result__a")?;
        let snippet_selector = selector("a.result__snippet, .result__snippet")?;

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
                .map(extract_redirect_target)
                .unwrap_or_default();

            // Skip DuckDuckGo internal links
            if !url.starts_with("http") || url.contains("duckduckgo.com") {
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

/// DuckDuckGo sometimes wraps result links as
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn extract_redirect_target(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + 5;
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        if let Ok(decoded) = urlencoding::decode(&href[start..end]) {
            if !decoded.is_empty() {
                return decoded.into_owned();
            }
        }
    }
    href.to_string()
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://duckduckgo.com")
            .official_api(false)
            .results_format("HTML")
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<HttpRequest> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), params.query.clone());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), params.lang.clone());

        Ok(HttpRequest::post(&self.html_url).form(form_data))
    }

    fn response(&self, response: HttpResponse) -> AnyhowResult<EngineResults> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        if response.is_captcha() {
            return Err(anyhow::anyhow!("CAPTCHA detected"));
        }

        let results = self.parse_html_results(&response.text)?;
        Ok(EngineResults::with_results(results))
    }
}
