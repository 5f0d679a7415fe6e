use thiserror::Error;

/// Message shown when the backend gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to load data. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The session is no longer valid (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Text suitable for the list's error affordance: the server-supplied
    /// message when there is one, otherwise a generic message.
    pub fn user_message(&self) -> String {
        match self {
            RepositoryError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DecodingError(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RepositoryError::DecodingError(err.to_string());
        }
        match err.status() {
            Some(status) if status == reqwest::StatusCode::UNAUTHORIZED => {
                RepositoryError::Unauthorized
            }
            Some(status) => RepositoryError::Status {
                status: status.as_u16(),
                message: None,
            },
            None => RepositoryError::ConnectionError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = RepositoryError::Status {
            status: 422,
            message: Some("Invalid date range".to_string()),
        };
        assert_eq!(err.user_message(), "Invalid date range");

        let err = RepositoryError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = RepositoryError::ConnectionError("refused".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
