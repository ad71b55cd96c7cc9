//! Feed session
//!
//! Runs a [`PaginationController`] on a single tokio task. Fetches run in
//! their own tasks and report back over a channel, so every list mutation
//! happens on the session task. Consumers steer the session through a
//! [`FeedHandle`] and observe it through a stream of [`FeedUpdate`]s.

use crate::error::{Error, FailureCause, Result};
use crate::http::{ConnectivityProbe, PageFetcher};
use crate::list::{FooterState, ListChange};
use crate::pagination::{
    Delivery, FetchFailure, FetchRequest, FetchTicket, PageState, PaginationController,
    ScreenState,
};
use crate::scroll::{ScrollTrigger, Viewport};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Input to a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    /// The view scrolled; the session decides whether it is near the end
    Scrolled(Viewport),
    /// The view is near the end
    NearEnd,
    /// The user tapped retry
    Retry,
    /// Drop everything and load page 1 again
    Reset,
    /// Tear the session down
    Shutdown,
}

/// Summary of the feed after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedSnapshot {
    /// Flag view of the pagination state
    pub state: PageState,
    /// Full-screen layer
    pub screen: ScreenState,
    /// Rows in the list, footer included
    pub row_count: usize,
    /// The footer row, if any
    pub footer: Option<FooterState>,
}

/// Published after every applied change
#[derive(Debug, Clone)]
pub struct FeedUpdate<T> {
    /// List mutations since the previous update
    pub changes: Vec<ListChange>,
    /// Items added since the previous update
    pub appended: Vec<T>,
    /// State after the changes
    pub snapshot: FeedSnapshot,
}

/// Handle for steering a running session
#[derive(Debug, Clone)]
pub struct FeedHandle {
    commands: mpsc::UnboundedSender<FeedCommand>,
}

impl FeedHandle {
    /// Send a command
    pub fn send(&self, command: FeedCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::SessionClosed)
    }

    /// Report a scroll position
    pub fn scrolled(&self, viewport: Viewport) -> Result<()> {
        self.send(FeedCommand::Scrolled(viewport))
    }

    /// Report that the view is near the end
    pub fn near_end(&self) -> Result<()> {
        self.send(FeedCommand::NearEnd)
    }

    /// Retry the failed page
    pub fn retry(&self) -> Result<()> {
        self.send(FeedCommand::Retry)
    }

    /// Reload from page 1
    pub fn reset(&self) -> Result<()> {
        self.send(FeedCommand::Reset)
    }

    /// Stop the session
    pub fn shutdown(&self) -> Result<()> {
        self.send(FeedCommand::Shutdown)
    }

    /// Whether the session is still running
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// A session ready to be spawned
pub struct FeedSession<T> {
    controller: PaginationController<T>,
    fetcher: Arc<dyn PageFetcher<T>>,
    probe: Arc<dyn ConnectivityProbe>,
    trigger: ScrollTrigger,
}

impl<T> FeedSession<T>
where
    T: Clone + Send + 'static,
{
    /// Create a session around an idle controller
    pub fn new(
        controller: PaginationController<T>,
        fetcher: Arc<dyn PageFetcher<T>>,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            controller,
            fetcher,
            probe,
            trigger: ScrollTrigger::default(),
        }
    }

    /// Use a custom near-end trigger for `Scrolled` commands
    #[must_use]
    pub fn with_trigger(mut self, trigger: ScrollTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Start the session task; page 1 is requested immediately
    pub fn spawn(
        self,
    ) -> (
        FeedHandle,
        mpsc::UnboundedReceiver<FeedUpdate<T>>,
        JoinHandle<()>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let task = SessionTask {
            controller: self.controller,
            fetcher: self.fetcher,
            probe: self.probe,
            trigger: self.trigger,
            updates: update_tx,
            completion_tx,
            published: 0,
        };
        let join = tokio::spawn(task.run(command_rx, completion_rx));

        (
            FeedHandle {
                commands: command_tx,
            },
            update_rx,
            join,
        )
    }
}

/// Outcome of one fetch, tagged with its ticket
struct Completion<T> {
    ticket: FetchTicket,
    outcome: std::result::Result<Vec<T>, FetchFailure>,
}

struct SessionTask<T> {
    controller: PaginationController<T>,
    fetcher: Arc<dyn PageFetcher<T>>,
    probe: Arc<dyn ConnectivityProbe>,
    trigger: ScrollTrigger,
    updates: mpsc::UnboundedSender<FeedUpdate<T>>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    /// Data items already sent to the consumer
    published: usize,
}

impl<T> SessionTask<T>
where
    T: Clone + Send + 'static,
{
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<FeedCommand>,
        mut completions: mpsc::UnboundedReceiver<Completion<T>>,
    ) {
        let request = self.controller.start();
        self.dispatch(request);
        let mut open = self.publish();

        while open {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(FeedCommand::Shutdown) => break,
                    Some(command) => open = self.handle_command(command),
                },
                Some(completion) = completions.recv() => {
                    open = self.handle_completion(completion);
                }
            }
        }

        self.controller.dispose();
        info!("Feed session closed");
    }

    /// Returns false once the consumer is gone
    fn handle_command(&mut self, command: FeedCommand) -> bool {
        let request = match command {
            FeedCommand::Scrolled(viewport) => {
                if !self
                    .trigger
                    .is_near_end(viewport, self.controller.list().item_count())
                {
                    return true;
                }
                self.controller.on_near_end()
            }
            FeedCommand::NearEnd => self.controller.on_near_end(),
            FeedCommand::Retry => match self.controller.retry() {
                Ok(request) => Some(request),
                Err(e) => {
                    debug!("Ignoring retry: {}", e);
                    None
                }
            },
            FeedCommand::Reset => Some(self.controller.reset()),
            FeedCommand::Shutdown => return false,
        };

        match request {
            Some(request) => {
                self.dispatch(request);
                self.publish()
            }
            None => true,
        }
    }

    fn handle_completion(&mut self, completion: Completion<T>) -> bool {
        let delivery = match completion.outcome {
            Ok(items) => self
                .controller
                .on_fetch_succeeded(completion.ticket, items),
            Err(failure) => self
                .controller
                .on_fetch_failed(completion.ticket, failure),
        };

        match delivery {
            Ok(Delivery::Applied) => self.publish(),
            Ok(Delivery::Ignored) => true,
            Err(e) => {
                warn!("Failed to apply fetch outcome: {}", e);
                true
            }
        }
    }

    /// Run the fetch on its own task and route the outcome back here
    fn dispatch(&self, request: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let probe = Arc::clone(&self.probe);
        let completions = self.completion_tx.clone();

        tokio::spawn(async move {
            // A panicking fetcher must still settle the outstanding ticket
            let result = AssertUnwindSafe(fetcher.fetch(request.page))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    warn!(page = request.page, "Page fetcher panicked");
                    Err(FailureCause::Other("page fetcher panicked".to_string()))
                });
            let outcome = match result {
                Ok(items) => Ok(items),
                Err(cause) => {
                    let is_connected = probe.is_connected().await;
                    Err(FetchFailure::new(cause, is_connected))
                }
            };
            if completions
                .send(Completion {
                    ticket: request.ticket,
                    outcome,
                })
                .is_err()
            {
                debug!(page = request.page, "Session gone, dropping fetch outcome");
            }
        });
    }

    /// Send an update; returns false once the consumer is gone
    fn publish(&mut self) -> bool {
        let list = self.controller.list();
        if list.data_count() < self.published {
            self.published = 0;
        }
        let appended = list.items()[self.published..].to_vec();
        self.published = list.data_count();

        let snapshot = FeedSnapshot {
            state: self.controller.state(),
            screen: self.controller.screen(),
            row_count: list.item_count(),
            footer: list.footer().cloned(),
        };
        let update = FeedUpdate {
            changes: self.controller.take_changes(),
            appended,
            snapshot,
        };

        if self.updates.send(update).is_err() {
            debug!("Update receiver dropped, stopping session");
            return false;
        }
        true
    }
}
