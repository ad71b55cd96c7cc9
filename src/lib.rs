// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # endless-feed
//!
//! A headless engine for endless-scrolling lists backed by a paged remote
//! source, plus a fetcher for a TMDB-compatible top-rated movies API.
//!
//! ## Features
//!
//! - **Pagination State Machine**: at most one fetch in flight, a fixed page bound, manual retry
//! - **Footer-Aware List Model**: a loading or retry footer that is always unique and last
//! - **Error Classification**: no-connectivity, timeout and unknown failures mapped to messages
//! - **Async Session**: single-task ownership of list state with message-passing fetch results
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use endless_feed::http::{MovieApiClient, ApiClientConfig, AlwaysOnline};
//! use endless_feed::pagination::PaginationController;
//! use endless_feed::session::FeedSession;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> endless_feed::Result<()> {
//!     let client = MovieApiClient::new(ApiClientConfig::builder().api_key("...").build())?;
//!     let session = FeedSession::new(
//!         PaginationController::with_total_pages(5),
//!         Arc::new(client),
//!         Arc::new(AlwaysOnline),
//!     );
//!     let (handle, mut updates, _join) = session.spawn();
//!
//!     while let Some(update) = updates.recv().await {
//!         for movie in &update.appended {
//!             println!("{}", movie.title);
//!         }
//!         if update.snapshot.state.is_last_page {
//!             break;
//!         }
//!         handle.near_end()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  ScrollTrigger ──near end──▶ PaginationController ──FetchRequest──▶ PageFetcher
//!                                 │        ▲                              │
//!                                 │        └──── outcome + ticket ────────┘
//!                                 ▼                 (ErrorClassifier)
//!                      ListModel: items + footer
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document error variant fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Failure classification and messages
pub mod classify;

/// List model with a trailing footer
pub mod list;

/// Pagination state machine
pub mod pagination;

/// Near-end-of-list detection
pub mod scroll;

/// Page fetcher, connectivity probe and movie API client
pub mod http;

/// Async driver owning the controller
pub mod session;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FailureCause, Result};
pub use types::*;

// Re-export commonly used types
pub use classify::{classify, ErrorClassification, ErrorMessages};
pub use config::FeedConfig;
pub use list::{FooterState, ListEntry, ListModel};
pub use pagination::{PaginationController, PageState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
