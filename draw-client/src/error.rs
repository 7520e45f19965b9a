//! Client error types.

use draw_core::DEFAULT_GENERATION_ERROR;
use thiserror::Error;

/// Result type for backend calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the generation backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL, or a URL returned by the backend, is invalid.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed unexpectedly.
    #[error("failed to parse backend payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}{}", detail_suffix(.detail))]
    Backend {
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, if any.
        detail: Option<String>,
    },

    /// A download was requested without a task id.
    #[error("no task id to download")]
    MissingTaskId,

    /// The response did not match the expected structure.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),
}

#[allow(clippy::ref_option)]
fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ClientError {
    /// The backend's own error message, when it sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Backend {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }

    /// Message suitable for showing to the user: the backend detail when
    /// present, otherwise this error's description.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        let message = self.to_string();
        if message.trim().is_empty() {
            DEFAULT_GENERATION_ERROR.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ClientError::Backend {
            status: 500,
            detail: Some("GPU on fire".to_string()),
        };
        assert_eq!(err.user_message(), "GPU on fire");
        assert_eq!(err.to_string(), "backend returned HTTP 500: GPU on fire");
    }

    #[test]
    fn test_user_message_without_detail() {
        let err = ClientError::Backend {
            status: 502,
            detail: None,
        };
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message(), "backend returned HTTP 502");

        let blank = ClientError::Backend {
            status: 500,
            detail: Some("  ".to_string()),
        };
        assert_eq!(blank.detail(), None);
    }

    #[test]
    fn test_missing_task_id_message() {
        assert_eq!(ClientError::MissingTaskId.user_message(), "no task id to download");
    }
}
