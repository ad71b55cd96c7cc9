//! Pagination module
//!
//! Drives incremental page loading for an endless list.
//!
//! # Overview
//!
//! [`PaginationController`] owns the page state machine and the
//! [`ListModel`](crate::list::ListModel) it keeps consistent. It performs no
//! I/O: every operation that needs a page returns a [`FetchRequest`], and the
//! caller delivers the outcome back with the request's [`FetchTicket`].
//! Outcomes carrying a ticket that does not match the outstanding fetch are
//! ignored, which makes late deliveries after a reset or teardown harmless.
//!
//! ```text
//!  Idle ──start──▶ FirstLoad ──ok, more──▶ Ready ──near end──▶ Loading ──fail──▶ RetryPending
//!                  │  │   ▲                  ▲                  │   │ ▲                │
//!                  │ fail retry              └─────ok, more─────┘   │ └─────retry──────┘
//!                  │  ▼   │                                         │
//!                  │ FirstLoadFailed                            ok, done
//!                  │                                                ▼
//!                  └───────────────────ok, done──────────────────▶ LastPage
//! ```

mod controller;
mod types;

pub use controller::PaginationController;
pub use types::{
    Delivery, FetchFailure, FetchRequest, FetchTicket, PagePhase, PageState, PaginationConfig,
    ScreenState, FIRST_PAGE,
};
