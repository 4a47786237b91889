//! Error taxonomy for the synchronization layer.
//!
//! Transports normalize every raw failure into one of these kinds before the
//! fetch coordinator sees it. The coordinator itself never classifies; it only
//! filters out [`SyncError::Cancelled`] and stale generations.

use casebook_model::ModelError;
use thiserror::Error;

/// A failed read or write, already classified.
///
/// Cloneable so it can live inside the observable [`QueryState`](crate::QueryState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The request was aborted through its cancellation signal.
    ///
    /// Never surfaced to a view.
    #[error("request cancelled")]
    Cancelled,

    /// Transport-level failure: connection, timeout, server error, throttling.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed request or response, or a backend rejection.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl SyncError {
    /// Whether this is the cancellation kind.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns a user-friendly message suitable for an error banner.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Cancelled => "The request was cancelled.",
            Self::Network(_) => "Could not reach the server. Please check your connection.",
            Self::Validation(message) => message,
            Self::NotFound(_) => "That record no longer exists.",
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<ModelError> for SyncError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Rejected { message } => Self::Validation(message),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("could not encode request body: {err}"))
    }
}

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
