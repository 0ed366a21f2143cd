//! Session error types.

use serde::Serialize;
use thiserror::Error;

use padlint_client::ClientError;

/// Coarse classification of failures, as reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Empty or unusable text; the check is skipped.
    InputError,
    /// The checker could not be reached or failed.
    TransportError,
    /// A range no longer fits the current document.
    StaleRange,
    /// The checker reported a range outside the checked document.
    MappingIncomplete,
}

/// Errors raised by a host document or highlight surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The host does not offer this capability.
    #[error("Operation not supported by this document")]
    Unsupported,

    /// The given range does not exist in the document.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Any other host failure.
    #[error("Host error: {0}")]
    Host(String),
}

impl DocumentError {
    /// Creates an invalid range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange(message.into())
    }

    /// Creates a host error.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

/// Errors that can occur while driving a check session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A check is already running.
    #[error("A check is already in progress")]
    AlreadyInProgress,

    /// The checker call failed.
    #[error("{}", .0.user_message())]
    Transport(#[from] ClientError),

    /// The highlight's source range does not fit the current document.
    #[error("Highlight '{0}' no longer matches the document")]
    StaleRange(String),

    /// No live highlight has this id.
    #[error("Unknown highlight '{0}'")]
    UnknownHighlight(String),

    /// The result arrived for content that is no longer current.
    #[error("Check result discarded because the document changed")]
    Discarded,

    /// Document error.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the error's classification, if it has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Transport(_) => Some(ErrorKind::TransportError),
            Self::StaleRange(_) => Some(ErrorKind::StaleRange),
            _ => None,
        }
    }
}
