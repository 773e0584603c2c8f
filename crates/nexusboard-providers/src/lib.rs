//! Calendar feed fetchers.
//!
//! - [`FeedFetcher`] - The trait the refresh cycle fetches through
//! - [`HttpFeedFetcher`] - Fetches feeds over HTTP(S)
//! - [`StaticFeedFetcher`] - Serves canned feeds from memory
//! - [`normalize_feed_url`] - `webcal://` rewriting and URL validation
//!
//! # Example
//!
//! ```ignore
//! use nexusboard_providers::{FeedFetcher, HttpFeedFetcher, HttpFetchConfig};
//!
//! let fetcher = HttpFeedFetcher::new(HttpFetchConfig::default())?;
//! let text = fetcher.fetch("webcal://example.com/team.ics").await?;
//! ```

pub mod error;
pub mod fetcher;
pub mod http;

pub use error::{FetchError, FetchErrorCode, FetchResult};
pub use fetcher::{BoxFuture, FeedFetcher, StaticFeedFetcher, normalize_feed_url};
pub use http::{HttpFeedFetcher, HttpFetchConfig};
