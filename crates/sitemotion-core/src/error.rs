//! Error types for sitemotion operations.
//!
//! Failures here never reach the page visitor: callers log them and fall back
//! to a static, fully visible page.

use thiserror::Error;

/// Core error type for sitemotion operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Configuration errors
    #[error("config parse error: {reason}")]
    ConfigParseFailed { reason: String },

    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    // Geometry errors
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    // Host errors
    #[error("host capability unavailable: {0}")]
    Unavailable(String),

    #[error("failed to attach '{event}' listener: {reason}")]
    ListenerFailed { event: String, reason: String },

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl Error {
    /// Create a config parse error.
    pub fn config_parse_failed(reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid config field error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid viewport error.
    pub fn invalid_viewport(reason: impl Into<String>) -> Self {
        Self::InvalidViewport {
            reason: reason.into(),
        }
    }

    /// Create an error for a missing host capability (window, document, observer).
    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable(what.into())
    }

    /// Create a listener attachment error.
    pub fn listener_failed(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ListenerFailed {
            event: event.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic DOM error.
    pub fn dom(reason: impl Into<String>) -> Self {
        Self::Dom(reason.into())
    }
}

/// Result type alias for sitemotion operations.
pub type Result<T> = std::result::Result<T, Error>;
