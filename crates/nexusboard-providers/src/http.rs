//! HTTP feed fetcher.
//!
//! Fetches feeds with a plain `GET`, following redirects, and hands back the
//! decoded body. The response content type is not checked; whatever text the
//! server returns goes to the parser.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Response, redirect};
use tracing::{debug, trace};

use crate::error::{FetchError, FetchResult};
use crate::fetcher::{BoxFuture, FeedFetcher, normalize_feed_url};

/// Configuration for [`HttpFeedFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFetchConfig {
    /// Whole-request timeout, body included.
    pub timeout: Duration,
    pub user_agent: String,
    pub accept: String,
    /// Redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl HttpFetchConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_USER_AGENT: &'static str = "NexusBoard/1.0";
    pub const DEFAULT_ACCEPT: &'static str = "text/calendar, text/plain, */*";
    pub const DEFAULT_MAX_REDIRECTS: usize = 10;

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

impl Default for HttpFetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            accept: Self::DEFAULT_ACCEPT.to_string(),
            max_redirects: Self::DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Fetches feeds over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
    config: HttpFetchConfig,
}

impl HttpFeedFetcher {
    /// Creates a fetcher with the given configuration.
    pub fn new(config: HttpFetchConfig) -> FetchResult<Self> {
        let accept = HeaderValue::from_str(&config.accept).map_err(|e| {
            FetchError::configuration(format!("invalid Accept header {:?}", config.accept))
                .with_source(e)
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, accept);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| {
                FetchError::configuration(format!("Failed to create HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpFetchConfig {
        &self.config
    }

    async fn get(&self, raw_url: &str) -> FetchResult<String> {
        let url = normalize_feed_url(raw_url)?;
        debug!(url = %url, "Fetching calendar feed");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        if response.url() != &url {
            trace!(from = %url, to = %response.url(), "Followed redirect");
        }

        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> FetchResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        if !status.is_success() {
            debug!(status = %status, url = %response.url(), "Non-success status");
            return Err(FetchError::status(status.as_u16(), status.canonical_reason()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(format!("Timed out reading feed: {e}")).with_source(e)
            } else {
                FetchError::invalid_body(format!("Failed to read feed body: {e}")).with_source(e)
            }
        })
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::timeout(format!("Request timed out: {e}")).with_source(e)
    } else {
        FetchError::network(format!("Request failed: {e}")).with_source(e)
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        Box::pin(self.get(url))
    }
}
