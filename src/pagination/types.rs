//! Pagination types
//!
//! Phase enum, fetch requests and the read-only views derived from them.

use crate::classify::{ErrorClassification, ErrorMessages};
use crate::error::FailureCause;
use serde::Serialize;
use std::fmt;

/// Number of the first page
pub const FIRST_PAGE: u32 = 1;

/// Configuration for a pagination controller
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Upper bound on how many pages will ever be requested
    pub total_pages: u32,
    /// Messages shown for classified failures
    pub messages: ErrorMessages,
}

impl PaginationConfig {
    /// Create a config with the given page bound (at least one page)
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages: total_pages.max(FIRST_PAGE),
            messages: ErrorMessages::default(),
        }
    }

    /// Override the failure messages
    #[must_use]
    pub fn with_messages(mut self, messages: ErrorMessages) -> Self {
        self.messages = messages;
        self
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Identifies one issued fetch
///
/// Tickets are unique for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FetchTicket(pub(crate) u64);

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A page the caller must fetch and report back on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Page number to fetch
    pub page: u32,
    /// Ticket to hand back with the outcome
    pub ticket: FetchTicket,
}

/// A failed fetch as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// What went wrong
    pub cause: FailureCause,
    /// Connectivity observed when the failure was reported
    pub is_connected: bool,
}

impl FetchFailure {
    /// Create a failure report
    pub fn new(cause: FailureCause, is_connected: bool) -> Self {
        Self {
            cause,
            is_connected,
        }
    }
}

/// Whether a delivered outcome changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The outcome matched the outstanding fetch and was applied
    Applied,
    /// The outcome was stale and dropped
    Ignored,
}

/// Phase of the pagination state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    /// Not started
    Idle,
    /// Page 1 in flight, nothing loaded yet
    FirstLoad { ticket: FetchTicket },
    /// Page 1 failed; a full-screen error is shown
    FirstLoadFailed { error: ErrorClassification },
    /// `page` in flight
    Loading { page: u32, ticket: FetchTicket },
    /// `page` loaded and more are expected
    Ready { page: u32 },
    /// Fetching `page` failed; waiting for a user retry
    RetryPending {
        page: u32,
        error: ErrorClassification,
    },
    /// `page` was the last one; terminal
    LastPage { page: u32 },
    /// Torn down; every event is ignored
    Disposed { page: u32 },
}

impl PagePhase {
    /// Current page number for this phase
    pub fn page(&self) -> u32 {
        match self {
            Self::Idle | Self::FirstLoad { .. } | Self::FirstLoadFailed { .. } => FIRST_PAGE,
            Self::Loading { page, .. }
            | Self::Ready { page }
            | Self::RetryPending { page, .. }
            | Self::LastPage { page }
            | Self::Disposed { page } => *page,
        }
    }

    /// Ticket of the outstanding fetch, if any
    pub fn in_flight(&self) -> Option<FetchTicket> {
        match self {
            Self::FirstLoad { ticket } | Self::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Short name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FirstLoad { .. } => "loading the first page",
            Self::FirstLoadFailed { .. } => "showing the first-page error",
            Self::Loading { .. } => "loading",
            Self::Ready { .. } => "ready",
            Self::RetryPending { .. } => "waiting for retry",
            Self::LastPage { .. } => "on the last page",
            Self::Disposed { .. } => "disposed",
        }
    }
}

impl fmt::Display for PagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flag view of the pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    /// Page most recently requested
    pub current_page: u32,
    /// Configured page bound
    pub total_pages: u32,
    /// A fetch is outstanding
    pub is_loading: bool,
    /// No further pages will be requested
    pub is_last_page: bool,
}

/// What the screen shows behind the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenState {
    /// Nothing started, or torn down
    Blank,
    /// Full-screen progress while the first page loads
    Loading,
    /// Full-screen error after the first page failed
    Error { message: String },
    /// The list itself
    List,
}
