//! Error types for feed fetching.
//!
//! A fetch failure never aborts a refresh; callers turn it into an empty
//! contribution for that feed. The error still carries enough detail for
//! logs and for the `check` command.

use std::fmt;
use thiserror::Error;

/// The category of a fetch error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorCode {
    /// The feed URL could not be parsed or uses an unsupported scheme.
    InvalidUrl,
    /// The server requires credentials or refused access (401, 403).
    Unauthorized,
    /// The feed does not exist (404, 410).
    NotFound,
    /// Too many requests (429).
    RateLimited,
    /// The server failed (5xx).
    ServerError,
    /// Any other non-success status.
    UnexpectedStatus,
    /// Connection, DNS, TLS or redirect failure.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The response body could not be read as text.
    InvalidBody,
    /// The fetcher itself could not be set up.
    Configuration,
}

impl FetchErrorCode {
    /// Returns true if a later attempt may succeed without any change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::RateLimited | Self::ServerError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::UnexpectedStatus => "unexpected_status",
            Self::Network => "network_error",
            Self::Timeout => "timeout",
            Self::InvalidBody => "invalid_body",
            Self::Configuration => "configuration_error",
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 | 410 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::UnexpectedStatus,
        }
    }
}

impl fmt::Display for FetchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that occurred while fetching one feed.
#[derive(Debug, Error)]
pub struct FetchError {
    code: FetchErrorCode,
    message: String,
    /// HTTP status, when the server answered.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    pub fn new(code: FetchErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::InvalidUrl, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::Timeout, message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::InvalidBody, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::Configuration, message)
    }

    /// Creates an error for a non-success HTTP status.
    ///
    /// `reason` is the canonical reason phrase, if known.
    pub fn status(status: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) => format!("Calendar fetch failed: {status} {reason}"),
            None => format!("Calendar fetch failed: {status}"),
        };
        Self {
            status: Some(status),
            ..Self::new(FetchErrorCode::from_status(status), message)
        }
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> FetchErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_codes() {
        assert!(FetchErrorCode::Network.is_retryable());
        assert!(FetchErrorCode::Timeout.is_retryable());
        assert!(FetchErrorCode::RateLimited.is_retryable());
        assert!(FetchErrorCode::ServerError.is_retryable());
        assert!(!FetchErrorCode::InvalidUrl.is_retryable());
        assert!(!FetchErrorCode::NotFound.is_retryable());
        assert!(!FetchErrorCode::Unauthorized.is_retryable());
        assert!(!FetchErrorCode::Configuration.is_retryable());
    }

    #[test]
    fn status_classification() {
        assert_eq!(FetchErrorCode::from_status(401), FetchErrorCode::Unauthorized);
        assert_eq!(FetchErrorCode::from_status(403), FetchErrorCode::Unauthorized);
        assert_eq!(FetchErrorCode::from_status(404), FetchErrorCode::NotFound);
        assert_eq!(FetchErrorCode::from_status(410), FetchErrorCode::NotFound);
        assert_eq!(FetchErrorCode::from_status(429), FetchErrorCode::RateLimited);
        assert_eq!(FetchErrorCode::from_status(503), FetchErrorCode::ServerError);
        assert_eq!(FetchErrorCode::from_status(418), FetchErrorCode::UnexpectedStatus);
    }

    #[test]
    fn status_error() {
        let err = FetchError::status(404, Some("Not Found"));
        assert_eq!(err.code(), FetchErrorCode::NotFound);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.message(), "Calendar fetch failed: 404 Not Found");
        assert_eq!(err.to_string(), "not_found: Calendar fetch failed: 404 Not Found");
    }

    #[test]
    fn status_error_without_reason() {
        let err = FetchError::status(599, None);
        assert_eq!(err.message(), "Calendar fetch failed: 599");
        assert!(err.is_retryable());
    }

    #[test]
    fn with_source() {
        use std::error::Error;
        let err = FetchError::network("connection reset")
            .with_source(std::io::Error::other("reset by peer"));
        assert!(err.source().is_some());
        assert!(err.status_code().is_none());
    }
}
