//! `TmdbClient` - HTTP client for the TMDB movie-list endpoints.
//!
//! One client instance is shared by every fetch the browser starts;
//! requests are paced and bearer-authenticated, and a bounded retry
//! absorbs 429 responses so a burst of settled search terms does not
//! surface as an error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalMovieApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{DiscoverParams, MovieListResponse, SearchParams, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// How many times a 429 response is retried before giving up.
const MAX_RETRIES: u32 = 3;

/// Base backoff between 429 retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Client for the TMDB v3 `discover/movie` and `search/movie` endpoints.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// Shared reqwest client.
    http_client: Client,
    /// Endpoint root (overridable for tests).
    base_url: Url,
    /// Bearer token sent with every request.
    api_token: String,
    /// Request pacer.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Points the client at a different endpoint root. Tests use this
    /// to aim at a local mock server.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent string (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum spacing between requests (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// An empty `api_token` is accepted so the browser can start
    /// without `TMDB_API_TOKEN`; requests then fail with HTTP 401 and
    /// surface through the normal error path.
    ///
    /// # Errors
    ///
    /// - `api_token` was never set.
    /// - `user_agent` was never set.
    /// - The underlying `reqwest::Client` fails to build.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is not set")?;
        let user_agent = self.user_agent.context("user_agent is not set")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("failed to parse default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to initialize HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Issues a paced GET for `path` and decodes the JSON body.
    ///
    /// Every request carries the bearer token and asks for JSON
    /// explicitly. A 429 answer is retried up to `MAX_RETRIES` times
    /// with a growing backoff; anything else non-2xx is an error,
    /// decoding TMDB's error body when it has one.
    #[instrument(skip_all)]
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .header(reqwest::header::ACCEPT, "application/json")
                .query(query)
                .build()
                .with_context(|| format!("failed to prepare request for {path}"))?;

            tracing::debug!(url = %request.url(), "fetching movie list");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request to {path} failed"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("gave up on {path} after {MAX_RETRIES} rate-limit retries");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "throttled by TMDB (429), backing off"
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.acquire().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB rejected the request (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB rejected the request (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read body from {path}"))?;
            return serde_json::from_str(&body)
                .with_context(|| format!("failed to decode movie payload from {path}"));
        }
    }
}

impl LocalMovieApi for TmdbClient {
    #[instrument(skip_all)]
    async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieListResponse> {
        let query: Vec<(&str, String)> = vec![
            ("sort_by", params.sort_by.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];

        self.request_json("discover/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn search_movies(&self, params: &SearchParams) -> Result<MovieListResponse> {
        let query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];

        self.request_json("search/movie", &query).await
    }
}
