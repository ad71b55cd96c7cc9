//! Pagination controller
//!
//! The state machine deciding when to fetch, which page to fetch, and how to
//! apply fetch outcomes to the list.

use super::types::{
    Delivery, FetchFailure, FetchRequest, FetchTicket, PagePhase, PageState, PaginationConfig,
    ScreenState, FIRST_PAGE,
};
use crate::classify::classify;
use crate::error::{Error, Result};
use crate::list::{FooterState, ListChange, ListModel};
use tracing::{debug, info, warn};

/// Pagination state machine plus the list it maintains
///
/// Not thread-safe. Whoever owns the controller is the single place list
/// mutations happen.
#[derive(Debug)]
pub struct PaginationController<T> {
    config: PaginationConfig,
    phase: PagePhase,
    list: ListModel<T>,
    next_ticket: u64,
}

impl<T> PaginationController<T> {
    /// Create an idle controller
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            config,
            phase: PagePhase::Idle,
            list: ListModel::new(),
            next_ticket: 0,
        }
    }

    /// Create an idle controller with default messages
    pub fn with_total_pages(total_pages: u32) -> Self {
        Self::new(PaginationConfig::new(total_pages))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Start from page 1, discarding anything loaded so far
    ///
    /// The first page is requested immediately, regardless of scroll position.
    pub fn start(&mut self) -> FetchRequest {
        self.list.clear();
        let ticket = self.issue_ticket();
        self.phase = PagePhase::FirstLoad { ticket };
        info!(total_pages = self.config.total_pages, %ticket, "Loading first page");
        FetchRequest {
            page: FIRST_PAGE,
            ticket,
        }
    }

    /// Rebuild the list from scratch
    pub fn reset(&mut self) -> FetchRequest {
        debug!(phase = %self.phase, "Resetting feed");
        self.start()
    }

    /// The view scrolled near the end of the list
    ///
    /// Returns the next page to fetch, or `None` when a fetch is already in
    /// flight, the last page was reached, or a failure awaits a retry.
    pub fn on_near_end(&mut self) -> Option<FetchRequest> {
        let PagePhase::Ready { page } = self.phase else {
            debug!(phase = %self.phase, "Ignoring near-end signal");
            return None;
        };

        let next = page + 1;
        let ticket = self.issue_ticket();
        self.phase = PagePhase::Loading { page: next, ticket };
        debug!(page = next, %ticket, "Loading next page");
        Some(FetchRequest { page: next, ticket })
    }

    /// A fetch completed with a page of items
    pub fn on_fetch_succeeded(&mut self, ticket: FetchTicket, items: Vec<T>) -> Result<Delivery> {
        if self.phase.in_flight() != Some(ticket) {
            debug!(%ticket, phase = %self.phase, "Dropping stale page");
            return Ok(Delivery::Ignored);
        }
        let page = self.phase.page();
        let count = items.len();

        self.list.remove_footer();
        self.list.append_items(items);

        // Same boundary rule for every page: more are expected below the bound.
        if page < self.config.total_pages {
            self.list.append_footer(FooterState::Loading)?;
            self.phase = PagePhase::Ready { page };
        } else {
            self.phase = PagePhase::LastPage { page };
            info!(page, "Reached last page");
        }

        debug!(page, count, total = self.list.data_count(), "Page loaded");
        Ok(Delivery::Applied)
    }

    /// A fetch failed
    ///
    /// A failed first page becomes a full-screen error. Any later page turns
    /// the footer into a retry prompt; the page number is kept so a retry
    /// asks for the same page again.
    pub fn on_fetch_failed(
        &mut self,
        ticket: FetchTicket,
        failure: FetchFailure,
    ) -> Result<Delivery> {
        if self.phase.in_flight() != Some(ticket) {
            debug!(%ticket, phase = %self.phase, "Dropping stale failure");
            return Ok(Delivery::Ignored);
        }
        let page = self.phase.page();
        let error = classify(&failure.cause, failure.is_connected);
        warn!(page, cause = %failure.cause, ?error, "Page fetch failed");

        if page == FIRST_PAGE && self.list.data_count() == 0 {
            self.list.remove_footer();
            self.phase = PagePhase::FirstLoadFailed { error };
            return Ok(Delivery::Applied);
        }

        let footer = FooterState::retry(self.config.messages.message(error));
        if self.list.footer().is_some() {
            self.list.set_footer_state(footer)?;
        } else {
            self.list.append_footer(footer)?;
        }
        self.phase = PagePhase::RetryPending { page, error };
        Ok(Delivery::Applied)
    }

    /// User asked to retry the failed page
    pub fn retry(&mut self) -> Result<FetchRequest> {
        let page = match self.phase {
            PagePhase::RetryPending { page, .. } => {
                if self.list.footer().is_some() {
                    self.list.set_footer_state(FooterState::Loading)?;
                } else {
                    self.list.append_footer(FooterState::Loading)?;
                }
                page
            }
            PagePhase::FirstLoadFailed { .. } => FIRST_PAGE,
            phase => return Err(Error::transition(phase.name(), "retry")),
        };

        let ticket = self.issue_ticket();
        self.phase = if page == FIRST_PAGE && self.list.data_count() == 0 {
            PagePhase::FirstLoad { ticket }
        } else {
            PagePhase::Loading { page, ticket }
        };
        info!(page, %ticket, "Retrying page");
        Ok(FetchRequest { page, ticket })
    }

    /// Tear down; later deliveries become no-ops
    pub fn dispose(&mut self) {
        if !matches!(self.phase, PagePhase::Disposed { .. }) {
            debug!(phase = %self.phase, "Disposing controller");
            self.phase = PagePhase::Disposed {
                page: self.phase.page(),
            };
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current phase
    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Flag view of the current phase
    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.phase.page(),
            total_pages: self.config.total_pages,
            is_loading: self.phase.in_flight().is_some(),
            is_last_page: matches!(self.phase, PagePhase::LastPage { .. }),
        }
    }

    /// What the screen shows behind the list
    pub fn screen(&self) -> ScreenState {
        match self.phase {
            PagePhase::Idle | PagePhase::Disposed { .. } => ScreenState::Blank,
            PagePhase::FirstLoad { .. } => ScreenState::Loading,
            PagePhase::FirstLoadFailed { error } => ScreenState::Error {
                message: self.config.messages.message(error).to_string(),
            },
            _ => ScreenState::List,
        }
    }

    /// The list being maintained
    pub fn list(&self) -> &ListModel<T> {
        &self.list
    }

    /// Drain list change notifications
    pub fn take_changes(&mut self) -> Vec<ListChange> {
        self.list.take_changes()
    }

    /// Configured page bound
    pub fn total_pages(&self) -> u32 {
        self.config.total_pages
    }

    fn issue_ticket(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }
}
