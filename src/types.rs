//! Common types used throughout endless-feed
//!
//! This module contains the feed item payload, the wire format of a page
//! and small utility types shared by several modules.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

// ============================================================================
// Movie
// ============================================================================

/// A single movie entry as returned by the top-rated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Remote identifier
    #[serde(default)]
    pub id: u64,

    /// Display title
    pub title: String,

    /// Release date as sent by the server (`YYYY-MM-DD`, may be empty)
    #[serde(default)]
    pub release_date: String,

    /// Poster path fragment, joined onto the image base URL
    #[serde(default)]
    pub poster_path: Option<String>,

    /// Plot summary
    #[serde(default)]
    pub overview: String,

    /// Average user rating
    #[serde(default)]
    pub vote_average: f64,
}

impl Movie {
    /// Create a movie with just a title and release date
    pub fn new(title: impl Into<String>, release_date: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            release_date: release_date.into(),
            poster_path: None,
            overview: String::new(),
            vote_average: 0.0,
        }
    }

    /// Set the poster path fragment
    #[must_use]
    pub fn with_poster(mut self, fragment: impl Into<String>) -> Self {
        self.poster_path = Some(fragment.into());
        self
    }

    /// Full poster URL for the given image base
    ///
    /// Returns `None` when the movie has no poster or the URL cannot be built.
    pub fn poster_url(&self, image_base: &str) -> Option<Url> {
        let fragment = self.poster_path.clone().none_if_empty()?;
        let base = if image_base.ends_with('/') {
            image_base.to_string()
        } else {
            format!("{image_base}/")
        };
        Url::parse(&base)
            .and_then(|b| b.join(fragment.trim_start_matches('/')))
            .ok()
    }

    /// Year component of the release date
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

// ============================================================================
// Page Response
// ============================================================================

/// One page of the top-rated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    /// Page number, starting at 1
    #[serde(default)]
    pub page: u32,

    /// Movies on this page
    #[serde(default)]
    pub results: Vec<Movie>,

    /// Total pages reported by the server (informational only)
    #[serde(default)]
    pub total_pages: Option<u32>,

    /// Total results reported by the server
    #[serde(default)]
    pub total_results: Option<u64>,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utility Traits
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
