//! Error classification for user-facing messages
//!
//! Maps a fetch failure plus the connectivity status observed at failure time
//! to one of three message categories.

use crate::error::FailureCause;
use serde::{Deserialize, Serialize};

/// User-facing category of a fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClassification {
    /// Device has no network
    NoConnectivity,
    /// The request timed out
    Timeout,
    /// Anything else
    Unknown,
}

/// Classify a failure.
///
/// Connectivity is checked first and wins over the cause.
pub fn classify(cause: &FailureCause, is_connected: bool) -> ErrorClassification {
    if !is_connected {
        ErrorClassification::NoConnectivity
    } else if cause.is_timeout() {
        ErrorClassification::Timeout
    } else {
        ErrorClassification::Unknown
    }
}

/// Message table for each classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    #[serde(default = "default_no_connectivity")]
    pub no_connectivity: String,

    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default = "default_unknown")]
    pub unknown: String,
}

fn default_no_connectivity() -> String {
    "No internet connection. Check your network and try again.".to_string()
}

fn default_timeout() -> String {
    "Connection timed out. Please try again.".to_string()
}

fn default_unknown() -> String {
    "Something went wrong. Please try again.".to_string()
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            no_connectivity: default_no_connectivity(),
            timeout: default_timeout(),
            unknown: default_unknown(),
        }
    }
}

impl ErrorMessages {
    /// Message for a classification
    pub fn message(&self, classification: ErrorClassification) -> &str {
        match classification {
            ErrorClassification::NoConnectivity => &self.no_connectivity,
            ErrorClassification::Timeout => &self.timeout,
            ErrorClassification::Unknown => &self.unknown,
        }
    }
}
