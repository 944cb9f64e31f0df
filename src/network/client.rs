//! HTTP client shared by the search, fetch and LLM providers

use super::request::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::{ConfigError, OutgoingSettings};
use crate::error::ProviderError;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client wrapper with retry and default browser-like headers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    extra_headers: HashMap<String, String>,
    retries: u32,
    retry_backoff: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, ConfigError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        let proxy_err = |e: reqwest::Error| ConfigError::Invalid {
            name: "outgoing.proxies".to_string(),
            reason: e.to_string(),
        };
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url).map_err(proxy_err)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http).map_err(proxy_err)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https).map_err(proxy_err)?);
            }
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: generate_user_agent(),
            extra_headers: settings.extra_headers.clone(),
            retries: settings.retries,
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    /// Execute a request
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request with custom timeout
    ///
    /// Timeouts, connection failures, 429 and 5xx responses are retried up to
    /// the configured count with exponential backoff. Any other non-2xx
    /// response is returned as-is for the caller to inspect.
    pub async fn execute_with_timeout(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, ProviderError> {
        let mut backoff = self.retry_backoff;
        let mut attempt = 0;

        loop {
            let outcome = match self.build(&request, timeout).send().await {
                Ok(response) => Self::parse_response(response).await,
                Err(e) => Err(ProviderError::from(e)),
            };

            let retryable = match &outcome {
                Ok(response) => response.status == 429 || response.status >= 500,
                Err(e) => e.is_transient(),
            };

            if !retryable || attempt >= self.retries {
                return outcome;
            }

            attempt += 1;
            match &outcome {
                Ok(response) => warn!(
                    "HTTP {} from {}, retry {}/{} in {:?}",
                    response.status, request.url, attempt, self.retries, backoff
                ),
                Err(e) => warn!(
                    "Request to {} failed ({}), retry {}/{} in {:?}",
                    request.url, e, attempt, self.retries, backoff
                ),
            }
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    fn build(&self, request: &HttpRequest, timeout: Duration) -> reqwest::RequestBuilder {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.timeout(timeout);

        // Default headers, unless the request brings its own
        let defaults = [
            ("User-Agent", self.user_agent.clone()),
            ("Accept", accept_html().to_string()),
            ("Accept-Language", accept_language("en")),
            ("DNT", "1".to_string()),
        ];
        for (key, value) in defaults {
            if !request.has_header(key) {
                req_builder = req_builder.header(key, value);
            }
        }
        for (key, value) in &self.extra_headers {
            if !request.has_header(key) {
                req_builder = req_builder.header(key, value);
            }
        }

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(ref token) = request.bearer {
            req_builder = req_builder.bearer_auth(token);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(ref body) = request.data {
            req_builder = match body {
                RequestBody::Form(data) => req_builder.form(data),
                RequestBody::Json(json) => req_builder.json(json),
            };
        }

        req_builder
    }

    /// Simple GET request
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        self.execute(HttpRequest::get(url)).await
    }

    /// Parse response into HttpResponse
    async fn parse_response(response: Response) -> Result<HttpResponse, ProviderError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_lowercase(), v.to_string());
            }
        }

        let text = response.text().await?;
        debug!("{} {} ({} bytes)", status, url, text.len());

        Ok(HttpResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
