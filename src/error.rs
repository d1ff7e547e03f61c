//! Error types for the invoice API client.
//!
//! Every failure surfaced by [`ApiClient`](crate::ApiClient) is an [`ApiError`]. Its
//! [`ErrorKind`] is the classification used both for retry decisions and for choosing the
//! user-facing message.
//!
//! | Kind | Status | Retried |
//! |------|--------|---------|
//! | [`ErrorKind::Configuration`] | 0 | no |
//! | [`ErrorKind::Network`] | 0 | yes |
//! | [`ErrorKind::Timeout`] | 408 | yes |
//! | [`ErrorKind::RateLimit`] | 429 | yes |
//! | [`ErrorKind::Server`] | 5xx | yes |
//! | [`ErrorKind::Client`] | other 4xx | no |
//!
//! Undecodable success bodies are not errors: they decode to [`Decoded::Null`](crate::Decoded::Null).

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classification of a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be built: malformed URL, header, or body. Raised before any I/O.
    Configuration,
    /// The server could not be reached or the exchange broke off without a response.
    Network,
    /// The attempt timed out or the server answered 408.
    Timeout,
    /// The server answered 429.
    RateLimit,
    /// The server answered with a 5xx status.
    Server,
    /// Any other non-success status.
    Client,
}

impl ErrorKind {
    /// Classify an HTTP status code. Status `0` stands for "no response".
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => ErrorKind::Network,
            408 => ErrorKind::Timeout,
            429 => ErrorKind::RateLimit,
            s if s >= 500 => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }

    /// Short, stable name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Server => "server",
            ErrorKind::Client => "client",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-level failure wrapped by an [`ApiError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorCause {
    /// Failure reported by the HTTP stack.
    #[error("transport failure: {0}")]
    Http(#[from] reqwest::Error),

    /// URL could not be parsed or joined.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Header name or value rejected by the HTTP layer.
    #[error("invalid header: {0}")]
    Header(String),

    /// Request body could not be serialized.
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The attempt did not finish within its timeout.
    #[error("attempt timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other failure, described in text.
    #[error("{0}")]
    Other(String),
}

/// The single error type returned to callers.
///
/// `Display` renders the localized, ready-to-show message. Fields are read-only once the
/// error is built.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: u16,
    payload: Option<Value>,
    url: Option<String>,
    #[source]
    cause: Option<ErrorCause>,
}

impl ApiError {
    pub(crate) fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
            status,
            payload: None,
            url: None,
            cause: None,
        }
    }

    /// Build a configuration error (status 0, never retried).
    pub(crate) fn configuration(message: impl Into<String>, cause: ErrorCause) -> Self {
        ApiError::new(ErrorKind::Configuration, 0, message).with_cause(cause)
    }

    pub(crate) fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = payload;
        self
    }

    pub(crate) fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub(crate) fn with_cause(mut self, cause: ErrorCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Classification of this failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Localized message suitable for display.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code; `0` when no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Error payload returned by the server, if one could be extracted.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Target URL of the failed call, when it got far enough to have one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Underlying failure, if any.
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// Whether the failure category allows another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind != ErrorKind::Configuration
            && crate::client::is_retryable_status(self.status)
    }
}

/// Errors raised while loading [`ClientConfig`](crate::ClientConfig) from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("failed to parse environment variable '{key}': {details}")]
    Parse {
        /// Variable name.
        key: String,
        /// Why parsing failed.
        details: String,
    },
}
