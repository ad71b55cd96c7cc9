//! HTTP module
//!
//! The page-fetching side of the feed: the [`PageFetcher`] and
//! [`ConnectivityProbe`] seams, and a reqwest-backed client for a
//! TMDB-compatible top-rated movies endpoint.
//!
//! # Features
//!
//! - **Failures as values**: fetchers return [`FailureCause`](crate::error::FailureCause), never panic
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Transport Retries**: Optional, off by default; pagination retries stay user-driven
//! - **Connectivity Probe**: TCP reachability check used to classify failures

mod client;
mod fetcher;
mod rate_limit;

pub use client::{ApiClientConfig, ApiClientConfigBuilder, MovieApiClient};
pub use fetcher::{AlwaysOnline, ConnectivityProbe, PageFetcher, TcpProbe};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
