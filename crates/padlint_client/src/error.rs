//! Error types for checking service calls.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Stable code of a failed check, surfaced to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    TextTooLong,
    RateLimit,
    ServerError,
    ServiceUnavailable,
    Timeout,
    InvalidResponse,
    UnknownError,
}

impl ErrorCode {
    /// Returns the wire form of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::TextTooLong => "TEXT_TOO_LONG",
            Self::RateLimit => "RATE_LIMIT",
            Self::ServerError => "SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for checking service calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service rejected the request (HTTP 400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The text exceeds the service's size limit (HTTP 413).
    #[error("Text too long (exceeds size limit)")]
    TextTooLong,

    /// Too many requests (HTTP 429).
    #[error("Rate limit exceeded")]
    RateLimit,

    /// The service failed internally (HTTP 5xx).
    #[error("Server error: {0}")]
    Server(u16),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The service could not be reached.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The request did not complete in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Network request failed for another reason.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::BadRequest(body),
            413 => Self::TextTooLong,
            429 => Self::RateLimit,
            s if s >= 500 => Self::Server(s),
            s => Self::UnexpectedStatus { status: s, body },
        }
    }

    /// Classifies a transport-level failure.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err)
        }
    }

    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::TextTooLong => ErrorCode::TextTooLong,
            Self::RateLimit => ErrorCode::RateLimit,
            Self::Server(_) => ErrorCode::ServerError,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::InvalidResponse(_) => ErrorCode::InvalidResponse,
            Self::UnexpectedStatus { .. }
            | Self::InvalidUrl(_)
            | Self::ClientBuild(_)
            | Self::Network(_) => ErrorCode::UnknownError,
        }
    }

    /// Returns the message shown to the end user.
    pub fn user_message(&self) -> String {
        match self.code() {
            ErrorCode::ServiceUnavailable => {
                "LanguageTool server is not available. Please check your configuration.".to_string()
            }
            ErrorCode::Timeout => "Request timed out. The text may be too long.".to_string(),
            ErrorCode::RateLimit => "Rate limit exceeded. Please try again later.".to_string(),
            _ => self.to_string(),
        }
    }

    /// Returns true if retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::RateLimit
                | ErrorCode::ServerError
                | ErrorCode::ServiceUnavailable
                | ErrorCode::Timeout
        )
    }
}
