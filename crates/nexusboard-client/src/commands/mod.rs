//! Subcommand implementations.

pub mod agenda;
pub mod check;
pub mod config;
pub mod month;
pub mod watch;

use nexusboard_providers::HttpFeedFetcher;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Builds the HTTP fetcher described by the `[fetch]` settings.
pub(crate) fn http_fetcher(config: &ClientConfig) -> ClientResult<HttpFeedFetcher> {
    Ok(HttpFeedFetcher::new(config.fetch.to_http_config())?)
}
