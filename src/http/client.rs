//! Movie API client
//!
//! Fetches pages of the top-rated movies listing from a TMDB-compatible API:
//! - Rate limiting to avoid API throttling
//! - Optional transport retries with configurable backoff
//! - Mapping of transport errors to fetch failure causes

use super::fetcher::PageFetcher;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, FailureCause, Result};
use crate::types::{BackoffType, Movie, MoviePage};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Path of the top-rated listing, relative to the base URL
const TOP_RATED_PATH: &str = "movie/top_rated";

/// Configuration for the movie API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the API (e.g. `https://api.themoviedb.org/3`)
    pub base_url: String,
    /// API key sent as the `api_key` query parameter
    pub api_key: Option<String>,
    /// Value of the `language` query parameter
    pub language: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of transport retries (0 = none)
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

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            language: "en_US".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("endless-feed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config builder
    pub fn builder() -> ApiClientConfigBuilder {
        ApiClientConfigBuilder::default()
    }
}

/// Builder for API client config
#[derive(Default)]
pub struct ApiClientConfigBuilder {
    config: ApiClientConfig,
}

impl ApiClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the response language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
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

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ApiClientConfig {
        self.config
    }
}

/// Client for the top-rated movies listing
pub struct MovieApiClient {
    client: Client,
    config: ApiClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl MovieApiClient {
    /// Create a client with the given configuration
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Fetch one page of top-rated movies
    pub async fn top_rated(&self, page: u32) -> Result<MoviePage> {
        let response = self.send(page).await?;
        let body: MoviePage = response.json().await?;
        debug!(page, count = body.results.len(), "Decoded page");
        Ok(body)
    }

    /// Send the page request, retrying transient failures up to `max_retries`
    async fn send(&self, page: u32) -> Result<Response> {
        let url = self.endpoint();
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .get(&url)
                .query(&[("language", self.config.language.as_str())])
                .query(&[("page", page)]);
            if let Some(ref key) = self.config.api_key {
                req = req.query(&[("api_key", key.as_str())]);
            }

            let error = match req.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Request succeeded: GET {} page={}", url, page);
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    if !is_retryable_status(status) {
                        return Err(Error::http_status(status.as_u16(), body));
                    }
                    Error::http_status(status.as_u16(), body)
                }
                Err(e) if e.is_timeout() => Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                },
                Err(e) if e.is_connect() => Error::Http(e),
                Err(e) => return Err(Error::Http(e)),
            };

            if attempt >= max_retries {
                return Err(error);
            }
            let delay = self.calculate_backoff(attempt);
            warn!(
                "Page {} failed ({}), attempt {}/{}, retrying in {:?}",
                page,
                error,
                attempt + 1,
                max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Full URL of the top-rated listing
    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/{TOP_RATED_PATH}")
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher<Movie> for MovieApiClient {
    async fn fetch(&self, page: u32) -> std::result::Result<Vec<Movie>, FailureCause> {
        self.top_rated(page)
            .await
            .map(|body| body.results)
            .map_err(FailureCause::from)
    }
}

impl std::fmt::Debug for MovieApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieApiClient")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.config.api_key.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Check if an HTTP status is worth retrying
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
