//! Error types for the session gate.
//!
//! The gate folds every one of these into a denial before page code runs, so
//! they mostly surface in logs, in the CLI, and in adapter implementations.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors produced while reading, decoding, refreshing, or persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No stored record, or the record carries no token.
    #[error("No active session")]
    NoSession,

    /// The token payload could not be parsed as a claims object.
    #[error("Token could not be decoded: {0}")]
    TokenUndecodable(String),

    /// The token decoded fine but its `exp` claim has passed.
    #[error("Token expired at {expires_at}")]
    TokenExpired {
        /// Expiry in epoch seconds, as found in the token.
        expires_at: i64,
    },

    /// The refresh endpoint answered with a non-success status or an unusable body.
    #[error("Token refresh rejected ({status}): {message}")]
    RefreshRejected {
        /// HTTP status code; `0` when the body, not the status, was the problem.
        status: u16,
        message: String,
    },

    /// Transport failure talking to the backend.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The session store could not be read or written.
    #[error("Session storage error: {0}")]
    StorageError(String),

    /// Invalid gate configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GateError {
    /// Build a refresh rejection caused by the response body rather than the status.
    pub fn malformed_refresh(message: impl Into<String>) -> Self {
        GateError::RefreshRejected {
            status: 0,
            message: message.into(),
        }
    }

    /// `true` when the failure means "there was never a session" rather than
    /// "the session could not be kept alive".
    pub fn is_missing_session(&self) -> bool {
        matches!(self, GateError::NoSession)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GateError::malformed_refresh(err.to_string())
        } else {
            GateError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::StorageError(format!("Invalid session record: {}", err))
    }
}
