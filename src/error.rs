//! Error types for endless-feed
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Fetch failures are a separate, value-level taxonomy ([`FailureCause`]):
//! a page fetcher never propagates them as `Error`, it hands them to the
//! pagination controller which turns them into a retry prompt.

use thiserror::Error;

/// The main error type for endless-feed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Feed State Errors
    // ============================================================================
    #[error("List invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("Invalid transition: cannot {event} while {phase}")]
    InvalidTransition { phase: String, event: String },

    #[error("Feed session is closed")]
    SessionClosed,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a list invariant error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an invalid state transition error
    pub fn transition(phase: impl Into<String>, event: impl Into<String>) -> Self {
        Self::InvalidTransition {
            phase: phase.into(),
            event: event.into(),
        }
    }
}

/// Result type alias for endless-feed
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// ============================================================================
// Fetch Failures
// ============================================================================

/// Why a page fetch failed
///
/// Delivered as a value to the pagination controller, never thrown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed page: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl FailureCause {
    /// Whether the failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Whether the transport never reached the server
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}

impl From<&reqwest::Error> for FailureCause {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl From<&Error> for FailureCause {
    fn from(err: &Error) -> Self {
        match err {
            Error::Timeout { .. } => Self::Timeout,
            Error::Http(e) => Self::from(e),
            Error::HttpStatus { status, body } => Self::Status {
                status: *status,
                body: body.clone(),
            },
            Error::JsonParse(e) => Self::Decode(e.to_string()),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Error> for FailureCause {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}
