//! The feed fetcher abstraction.
//!
//! A [`FeedFetcher`] turns a feed URL into the raw text of that feed. The
//! refresh cycle only ever sees text or a [`FetchError`]; parsing happens
//! elsewhere.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::trace;
use url::Url;

use crate::error::{FetchError, FetchErrorCode, FetchResult};

/// A boxed future for the object-safe fetcher trait.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const WEBCAL_SCHEME: &str = "webcal://";

/// Normalizes a configured feed URL.
///
/// Surrounding whitespace is trimmed and a leading `webcal://` is rewritten
/// to `https://`. Anything that is not then an absolute `http` or `https`
/// URL is rejected.
pub fn normalize_feed_url(raw: &str) -> FetchResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::invalid_url("empty feed URL"));
    }

    let rewritten = match trimmed.get(..WEBCAL_SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(WEBCAL_SCHEME) => {
            format!("https://{}", &trimmed[WEBCAL_SCHEME.len()..])
        }
        _ => trimmed.to_string(),
    };

    let url = Url::parse(&rewritten).map_err(|e| {
        FetchError::invalid_url(format!("invalid feed URL {trimmed:?}: {e}")).with_source(e)
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::invalid_url(format!(
            "unsupported scheme {other:?} in feed URL"
        ))),
    }
}

/// Retrieves the raw text of calendar feeds.
///
/// Implementations must be usable from several concurrent fetches at once.
pub trait FeedFetcher: Send + Sync {
    /// Short name used in logs (e.g. "http", "static").
    fn name(&self) -> &str;

    /// Fetches the feed at `url`.
    ///
    /// `url` is the configured value; implementations normalize it with
    /// [`normalize_feed_url`] before use.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>>;
}

#[derive(Debug, Clone)]
enum StaticResponse {
    Body(String),
    Failure(FetchErrorCode, String),
}

/// A fetcher serving canned responses from memory.
///
/// URLs are matched after normalization, so `webcal://host/cal.ics` finds an
/// entry registered as `https://host/cal.ics`. Unknown URLs fail with
/// [`FetchErrorCode::NotFound`].
#[derive(Debug, Default)]
pub struct StaticFeedFetcher {
    responses: HashMap<String, StaticResponse>,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl StaticFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a feed body for `url`.
    pub fn with_feed(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .insert(Self::key(url), StaticResponse::Body(body.into()));
        self
    }

    /// Registers a failure for `url`.
    pub fn with_failure(
        mut self,
        url: &str,
        code: FetchErrorCode,
        message: impl Into<String>,
    ) -> Self {
        self.responses
            .insert(Self::key(url), StaticResponse::Failure(code, message.into()));
        self
    }

    /// Makes every fetch wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches started so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn key(url: &str) -> String {
        normalize_feed_url(url).map_or_else(|_| url.trim().to_string(), String::from)
    }

    fn lookup(&self, url: &str) -> FetchResult<String> {
        let normalized = normalize_feed_url(url)?;
        match self.responses.get(normalized.as_str()) {
            Some(StaticResponse::Body(body)) => Ok(body.clone()),
            Some(StaticResponse::Failure(code, message)) => {
                Err(FetchError::new(*code, message.clone()))
            }
            None => Err(FetchError::new(
                FetchErrorCode::NotFound,
                format!("no static feed registered for {normalized}"),
            )),
        }
    }
}

impl FeedFetcher for StaticFeedFetcher {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            trace!(url = %url, "Serving static feed");
            self.lookup(url)
        })
    }
}
