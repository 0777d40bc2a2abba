//! Session error types.

use thiserror::Error;

/// Error type for session and request operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An authenticated operation was attempted with no access token stored
    #[error("Not logged in")]
    NoSession,

    /// The server rejected the access token and refreshing it failed
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Sign-in rejected by the server
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Non-success response the caller asked us to interpret
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure not raised by reqwest (custom transports)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A header could not be built from the given value
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Token storage error
    #[error("Storage error: {0}")]
    Storage(#[from] token_storage::StorageError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,
}

impl SessionError {
    /// Returns true if this error is transient and the operation can be retried.
    ///
    /// Transient errors include:
    /// - Transport failures and timeouts
    /// - HTTP errors with 5xx status codes
    /// - Connection errors
    pub fn is_transient(&self) -> bool {
        match self {
            SessionError::Timeout => true,
            SessionError::Transport(_) => true,
            SessionError::Api { status, .. } => *status >= 500,
            SessionError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            _ => false,
        }
    }

    /// True when the user has to sign in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionError::NoSession | SessionError::SessionExpired)
    }
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
