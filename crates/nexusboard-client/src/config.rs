//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/nexusboard/config.toml` by default. A missing file means
//! defaults: no feeds, a five minute refresh interval.
//!
//! ```toml
//! calendar_urls = [
//!     "webcal://p01-caldav.icloud.com/published/2/abc",
//!     "https://calendar.google.com/calendar/ical/me/basic.ics",
//! ]
//! refresh_interval_secs = 300
//!
//! [fetch]
//! timeout_secs = 30
//! user_agent = "NexusBoard/1.0"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nexusboard_providers::{HttpFetchConfig, normalize_feed_url};

use crate::error::{ClientError, ClientResult};

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Configuration for the nexusboard client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Calendar feeds to aggregate, in display priority order.
    pub calendar_urls: Vec<String>,

    /// Seconds between refreshes in `watch` mode.
    pub refresh_interval_secs: u64,

    /// Debug mode.
    pub debug: bool,

    /// HTTP settings for feed fetching.
    pub fetch: FetchSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            calendar_urls: Vec::new(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            debug: false,
            fetch: FetchSettings::default(),
        }
    }
}

/// Settings passed to the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: HttpFetchConfig::DEFAULT_TIMEOUT_SECS,
            user_agent: HttpFetchConfig::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    /// Converts to the fetcher configuration.
    pub fn to_http_config(&self) -> HttpFetchConfig {
        HttpFetchConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(&self.user_agent)
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// Returns the defaults when the file does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ClientError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexusboard")
    }

    /// Returns the feeds to use: `overrides` if any were given, else the
    /// configured list. Blank entries are dropped.
    pub fn feed_urls(&self, overrides: &[String]) -> Vec<String> {
        let source = if overrides.is_empty() {
            &self.calendar_urls
        } else {
            overrides
        };
        source
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Checks the settings and every configured feed URL.
    pub fn validate(&self) -> ClientResult<()> {
        if self.refresh_interval_secs == 0 {
            return Err(ClientError::Config(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ClientError::Config(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ClientError::Config("fetch.user_agent must not be empty".into()));
        }

        for (index, url) in self.calendar_urls.iter().enumerate() {
            normalize_feed_url(url).map_err(|e| {
                ClientError::Config(format!("calendar_urls[{index}]: {}", e.message()))
            })?;
        }
        Ok(())
    }
}
