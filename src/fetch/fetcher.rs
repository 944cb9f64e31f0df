//! HTTP page fetcher

use super::extract::{clean_text, extractor_for, truncate_chars, Extractor};
use super::traits::FetchExtractProvider;
use crate::config::FetchSettings;
use crate::error::ProviderError;
use crate::network::{accept_html, HttpClient, HttpRequest, FETCH_USER_AGENT};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Content types worth handing to an extractor
const TEXT_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

/// Fetches pages over HTTP and extracts their text with a configured heuristic
pub struct HttpFetcher {
    client: HttpClient,
    extractor: Box<dyn Extractor>,
    timeout: Duration,
    max_content_chars: usize,
    min_content_chars: usize,
}

impl HttpFetcher {
    /// Create a fetcher from settings
    pub fn new(client: HttpClient, settings: &FetchSettings) -> Self {
        Self {
            client,
            extractor: extractor_for(settings.extractor),
            timeout: Duration::from_secs_f64(settings.timeout),
            max_content_chars: settings.max_content_chars,
            min_content_chars: settings.min_content_chars.max(1),
        }
    }
}

#[async_trait]
impl FetchExtractProvider for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        let request = HttpRequest::get(url)
            .header("User-Agent", FETCH_USER_AGENT)
            .header("Accept", accept_html());

        let response = self.client.execute_with_timeout(request, self.timeout).await?;
        if !response.is_success() {
            return Err(ProviderError::Http {
                status: response.status,
            });
        }

        if let Some(content_type) = response.content_type() {
            let content_type = content_type.to_ascii_lowercase();
            if !TEXT_CONTENT_TYPES.iter().any(|t| content_type.starts_with(t)) {
                return Err(ProviderError::Decode(format!(
                    "unsupported content type {}",
                    content_type
                )));
            }
        }

        if response.text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        debug!("Fetched {} ({} bytes)", url, response.text.len());
        Ok(response.text)
    }

    fn extract(&self, raw: &str, url: &str) -> Option<String> {
        let text = clean_text(&self.extractor.extract(raw));
        let chars = text.chars().count();

        if chars < self.min_content_chars {
            debug!(
                "{} extracted {} chars from {}, below threshold",
                self.extractor.name(),
                chars,
                url
            );
            return None;
        }

        debug!("{} extracted {} chars from {}", self.extractor.name(), chars, url);
        Some(truncate_chars(&text, self.max_content_chars).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtractorKind, OutgoingSettings};
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(settings: FetchSettings) -> HttpFetcher {
        let client = HttpClient::with_settings(&OutgoingSettings {
            retries: 0,
            ..Default::default()
        })
        .unwrap();
        HttpFetcher::new(client, &settings)
    }

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(body)
    }

    #[tokio::test]
    async fn test_fetch_extract_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header_regex("user-agent", "DeepResearchBot/2.0"))
            .respond_with(html(
                "<html><body><nav>menu</nav><p>Chlorophyll absorbs light.</p></body></html>",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let text = fetcher(FetchSettings::default())
            .fetch_extract(&format!("{}/page", server.uri()))
            .await;
        assert_eq!(text.as_deref(), Some("Chlorophyll absorbs light."));
    }

    #[tokio::test]
    async fn test_http_error_is_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = fetcher(FetchSettings::default());
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err, ProviderError::Http { status: 404 });
        assert!(fetcher.fetch_extract(&server.uri()).await.is_none());
    }

    #[tokio::test]
    async fn test_binary_content_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4".to_vec()),
            )
            .mount(&server)
            .await;

        let err = fetcher(FetchSettings::default())
            .fetch(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn test_extract_threshold_and_truncation() {
        let fetcher = fetcher(FetchSettings {
            min_content_chars: 10,
            max_content_chars: 12,
            ..Default::default()
        });

        assert!(fetcher.extract("<p>short</p>", "https://a.com").is_none());
        assert_eq!(
            fetcher
                .extract("<p>long enough paragraph</p>", "https://a.com")
                .as_deref(),
            Some("long enough ")
        );
    }

    #[test]
    fn test_configured_extractor_is_used() {
        let article = "Photosynthesis converts light energy into chemical energy stored in glucose, \
                       releasing oxygen as a by-product of splitting water.";
        let page = format!(
            "<html><body><article>{}</article><div>Sidebar links</div></body></html>",
            article
        );

        let readability = fetcher(FetchSettings {
            extractor: ExtractorKind::Readability,
            ..Default::default()
        })
        .extract(&page, "")
        .unwrap();
        assert!(readability.starts_with("Photosynthesis converts"));
        assert!(!readability.contains("Sidebar"));

        let stripped = fetcher(FetchSettings {
            extractor: ExtractorKind::TagStrip,
            ..Default::default()
        })
        .extract(&page, "")
        .unwrap();
        assert!(stripped.starts_with("Photosynthesis converts"));
        assert!(stripped.contains("Sidebar links"));
    }
}
