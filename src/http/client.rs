//! HTTP client with retry and rate limiting
//!
//! Provides a robust HTTP client that handles:
//! - Automatic retries with configurable backoff
//! - Rate limiting to stay under platform quotas
//! - Cooperative cancellation of waits and in-flight requests
//! - Error classification and platform error message extraction

use super::meta::{ResponseMeta, REQUEST_ID_HEADER};
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::Authenticator;
use crate::cancel::StopSignal;
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body carried into an error message
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("assetq/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// A fully read response plus its transport metadata
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status
    pub status: u16,
    /// Response body text
    pub body: String,
    /// Request/response descriptors and attempt count
    pub meta: ResponseMeta,
}

impl HttpResponse {
    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(Error::JsonParse)
    }
}

/// Outcome of one attempt inside the retry loop
enum Attempt {
    Done(HttpResponse),
    Retry { delay: Duration, error: Error },
    Fail(Error),
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = authenticator;
        Ok(client)
    }

    /// POST a JSON body, retrying transient failures
    pub async fn post(&self, url: &str, body: Value, stop: &StopSignal) -> Result<HttpResponse> {
        let full_url = self.build_url(url);
        let max_retries = self.config.max_retries;

        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            if let Some(err) = stop.error() {
                return Err(err);
            }

            if let Some(ref limiter) = self.rate_limiter {
                tokio::select! {
                    () = limiter.wait() => {}
                    reason = stop.stopped() => return Err(stop.classify(reason)),
                }
            }

            let outcome = tokio::select! {
                outcome = self.attempt(&full_url, &body, attempt, max_retries) => outcome,
                reason = stop.stopped() => return Err(stop.classify(reason)),
            };

            match outcome {
                Attempt::Done(response) => return Ok(response),
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { delay, error } => {
                    warn!(
                        "{error}, attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1,
                    );
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        reason = stop.stopped() => return Err(stop.classify(reason)),
                    }
                    last_error = Some(error);
                    attempt += 1;
                }
            }
        }

        // Exhausted all retries
        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Send one attempt and decide whether it is final
    async fn attempt(
        &self,
        full_url: &str,
        body: &Value,
        attempt: u32,
        max_retries: u32,
    ) -> Attempt {
        let req = self
            .client
            .post(full_url)
            .header("Accept", "application/json")
            .json(body);
        let req = self.authenticator.apply(req);

        let can_retry = attempt < max_retries;

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                let error = Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                };
                return self.retry_or_fail(error, attempt, can_retry);
            }
            Err(e) => return self.retry_or_fail(Error::Http(e), attempt, can_retry),
        };

        let status = response.status();
        let request_id = extract_request_id(response.headers());
        let retry_after = extract_retry_after(response.headers());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return if can_retry {
                Attempt::Retry {
                    delay: Duration::from_secs(retry_after).min(self.config.max_backoff),
                    error: Error::RateLimited {
                        retry_after_seconds: retry_after,
                    },
                }
            } else {
                Attempt::Fail(Error::RateLimited {
                    retry_after_seconds: retry_after,
                })
            };
        }

        let failed = status.is_client_error() || status.is_server_error();
        if failed && can_retry && Error::is_retryable_status(status.as_u16()) {
            return Attempt::Retry {
                delay: self.calculate_backoff(attempt),
                error: Error::http_status(status.as_u16(), String::new()),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Fail(Error::Http(e)),
        };

        if failed {
            return Attempt::Fail(Error::http_status(
                status.as_u16(),
                platform_error_message(&body),
            ));
        }

        debug!("Request succeeded: POST {} ({})", full_url, status.as_u16());
        Attempt::Done(HttpResponse {
            status: status.as_u16(),
            body,
            meta: ResponseMeta::new("POST", full_url, status.as_u16(), attempt + 1)
                .with_request_id(request_id),
        })
    }

    /// Retry a transient failure while attempts remain
    fn retry_or_fail(&self, error: Error, attempt: u32, can_retry: bool) -> Attempt {
        if can_retry && error.is_retryable() {
            Attempt::Retry {
                delay: self.calculate_backoff(attempt),
                error,
            }
        } else {
            Attempt::Fail(error)
        }
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}

fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Pull the human-readable message out of a platform error body.
///
/// The platform answers errors as `{"error": {"message": ..}}`, older
/// endpoints as `{"detail": ..}` or `{"message": ..}`; anything else is
/// passed through, truncated.
pub(crate) fn platform_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("detail"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
