//! Error types for sgate
//!
//! User-facing messages for the terminal front end. Gate errors are passed
//! through with their own wording; everything else gets a short prefix.

use session_gate::GateError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CLIError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CLIError {
    /// Error from the session-gate library
    GateError(GateError),

    /// Configuration file or flag error
    ConfigurationError(String),
}

impl CLIError {
    fn format_gate_error(err: &GateError) -> String {
        match err {
            GateError::NetworkError(msg) => Self::clean_nested_message(msg),
            GateError::StorageError(msg) => msg.clone(),
            GateError::ConfigurationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    fn clean_nested_message(message: &str) -> String {
        let mut cleaned = message.trim();
        let prefixes = ["error sending request for url", "Network error:"];

        loop {
            let mut stripped = false;
            for prefix in &prefixes {
                if let Some(rest) = cleaned.strip_prefix(prefix) {
                    cleaned = rest.trim_start();
                    stripped = true;
                    break;
                }
            }

            if !stripped {
                break;
            }
        }

        cleaned.to_string()
    }
}

impl fmt::Display for CLIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLIError::GateError(e) => write!(f, "{}", Self::format_gate_error(e)),
            CLIError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CLIError {}

impl From<GateError> for CLIError {
    fn from(err: GateError) -> Self {
        CLIError::GateError(err)
    }
}

impl From<toml::de::Error> for CLIError {
    fn from(err: toml::de::Error) -> Self {
        CLIError::ConfigurationError(format!("Invalid config file: {}", err))
    }
}
