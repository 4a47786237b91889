//! Errors raised while turning wire envelopes into typed data.

use thiserror::Error;

/// An envelope did not have the shape its resource expects.
///
/// Every variant is a reason to reject the response outright; nothing is
/// partially applied.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The backend answered with `success: false`.
    #[error("request rejected by backend: {message}")]
    Rejected {
        /// Message from the envelope's `error` field.
        message: String,
    },

    /// A successful envelope carried no `data` field.
    #[error("response for {resource} is missing its data payload")]
    MissingData {
        /// Resource name the envelope was parsed for.
        resource: &'static str,
    },

    /// `data` did not deserialize into the expected entity shape.
    #[error("malformed {resource} payload: {source}")]
    Malformed {
        /// Resource name the envelope was parsed for.
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Returns a short message suitable for an error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::MissingData { .. } | Self::Malformed { .. } => {
                "The server sent a response this version cannot read.".to_string()
            }
        }
    }

    /// Always `false`: the same response will be rejected again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
