//! Error types for the HTTP transport.

use casebook_sync::SyncError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the backing API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The configured base URL or a request path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend refused the request as invalid (400/422).
    #[error("rejected: {0}")]
    Rejected(String),

    /// Too many requests, either locally or reported by the backend.
    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds until the window resets.
        retry_after: u64,
    },

    /// Any other non-success status.
    #[error("backend error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },

    /// The response body was not a valid envelope.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a non-success response.
    ///
    /// `message` is the backend's error text when the body carried one.
    #[must_use]
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Rejected(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { retry_after: 60 },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout,
            _ => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) | Self::Timeout => {
                "Could not reach the server. Please check your connection."
            }
            Self::NotFound(_) => "That record no longer exists.",
            Self::Rejected(message) => message,
            Self::RateLimited { .. } => "Too many requests. Please wait a moment and try again.",
            Self::Status { status, .. } if *status >= 500 => {
                "The server ran into a problem. Please try again."
            }
            Self::InvalidUrl(_) | Self::Status { .. } | Self::Decode(_) => {
                "An unexpected error occurred."
            }
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(message) => Self::NotFound(message),
            ClientError::Rejected(message) => Self::Validation(message),
            ClientError::Decode(_) | ClientError::InvalidUrl(_) => Self::Validation(err.to_string()),
            ClientError::Status { status, .. } if status < 500 => Self::Validation(err.to_string()),
            _ => Self::Network(err.to_string()),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, None),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, Some("bad date".into())),
            ClientError::Rejected(ref m) if m == "bad date"
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::TOO_MANY_REQUESTS, None),
            ClientError::RateLimited { .. }
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, None),
            ClientError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn test_sync_error_kinds() {
        let not_found: SyncError = ClientError::NotFound("task 9".into()).into();
        assert_eq!(not_found, SyncError::NotFound("task 9".into()));

        let rejected: SyncError = ClientError::Rejected("Title is required".into()).into();
        assert_eq!(rejected, SyncError::Validation("Title is required".into()));

        let server: SyncError = ClientError::Status {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert!(server.is_retryable());

        let conflict: SyncError = ClientError::Status {
            status: 409,
            message: "conflict".into(),
        }
        .into();
        assert!(matches!(conflict, SyncError::Validation(_)));

        let throttled: SyncError = ClientError::RateLimited { retry_after: 5 }.into();
        assert!(throttled.is_retryable());
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(!ClientError::Rejected("no".into()).is_retryable());
        assert!(!ClientError::Decode("eof".into()).is_retryable());
    }
}
