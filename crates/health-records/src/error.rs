//! Records error types.

use session_client::SessionError;
use thiserror::Error;

/// Error type for record operations.
#[derive(Error, Debug)]
pub enum RecordsError {
    /// Session or transport failure from the request layer
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A success envelope was missing its payload key
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    /// The signed-in user could not be determined
    #[error("Current user unavailable: {0}")]
    UserUnavailable(String),
}

impl RecordsError {
    /// The message a user should see: the server's own text for API errors.
    pub fn user_message(&self) -> String {
        match self {
            RecordsError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the user has to sign in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, RecordsError::Session(e) if e.requires_login())
    }

    pub fn is_transient(&self) -> bool {
        match self {
            RecordsError::Session(e) => e.is_transient(),
            RecordsError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using RecordsError.
pub type RecordsResult<T> = Result<T, RecordsError>;
