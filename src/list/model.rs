//! List model and footer types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// State shown by the footer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FooterState {
    /// More pages are expected; show a progress indicator
    Loading,
    /// The last page fetch failed; show the message and a retry affordance
    RetryPrompt {
        /// User-facing error message
        message: String,
    },
}

impl FooterState {
    /// Create a retry prompt
    pub fn retry(message: impl Into<String>) -> Self {
        Self::RetryPrompt {
            message: message.into(),
        }
    }

    /// Check if this is a retry prompt
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::RetryPrompt { .. })
    }
}

/// A row in the list, addressed by index
#[derive(Debug, PartialEq)]
pub enum ListEntry<'a, T> {
    /// A data item
    Item(&'a T),
    /// The trailing footer
    Footer(&'a FooterState),
}

// Manual impls: a derive would require `T: Copy`.
impl<T> Clone for ListEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListEntry<'_, T> {}

impl<'a, T> ListEntry<'a, T> {
    /// The item, if this row is one
    pub fn as_item(&self) -> Option<&'a T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Footer(_) => None,
        }
    }

    /// Check if this row is the footer
    pub fn is_footer(&self) -> bool {
        matches!(self, Self::Footer(_))
    }
}

/// Notification for a single list mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListChange {
    /// `count` rows inserted starting at `start`
    Inserted { start: usize, count: usize },
    /// The row at `index` was removed
    Removed { index: usize },
    /// The row at `index` changed in place
    Changed { index: usize },
    /// All `count` rows were removed
    Cleared { count: usize },
}

/// Ordered list of items plus an optional trailing footer
#[derive(Debug, Clone)]
pub struct ListModel<T> {
    items: Vec<T>,
    footer: Option<FooterState>,
    changes: Vec<ListChange>,
}

impl<T> Default for ListModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListModel<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            footer: None,
            changes: Vec::new(),
        }
    }

    /// Append a batch of items, preserving order
    ///
    /// Items always land before the footer. Records one `Inserted` change
    /// for a non-empty batch.
    pub fn append_items(&mut self, batch: impl IntoIterator<Item = T>) {
        let start = self.items.len();
        self.items.extend(batch);
        let count = self.items.len() - start;
        if count > 0 {
            self.changes.push(ListChange::Inserted { start, count });
        }
    }

    /// Append the footer row
    pub fn append_footer(&mut self, state: FooterState) -> Result<()> {
        if self.footer.is_some() {
            return Err(Error::invariant(
                "footer already present; use set_footer_state to update it",
            ));
        }
        self.footer = Some(state);
        self.changes.push(ListChange::Inserted {
            start: self.items.len(),
            count: 1,
        });
        Ok(())
    }

    /// Remove the footer row if present
    pub fn remove_footer(&mut self) {
        if self.footer.take().is_some() {
            self.changes.push(ListChange::Removed {
                index: self.items.len(),
            });
        }
    }

    /// Replace the footer's state in place
    pub fn set_footer_state(&mut self, state: FooterState) -> Result<()> {
        let Some(footer) = self.footer.as_mut() else {
            return Err(Error::invariant("no footer to update"));
        };
        if *footer != state {
            *footer = state;
            self.changes.push(ListChange::Changed {
                index: self.items.len(),
            });
        }
        Ok(())
    }

    /// Remove every row, footer included
    pub fn clear(&mut self) {
        let count = self.item_count();
        self.items.clear();
        self.footer = None;
        if count > 0 {
            debug!(count, "Cleared list");
            self.changes.push(ListChange::Cleared { count });
        }
    }

    /// Number of rows, footer included
    pub fn item_count(&self) -> usize {
        self.items.len() + usize::from(self.footer.is_some())
    }

    /// Number of data items, footer excluded
    pub fn data_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the list has no rows at all
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Row at `index`
    pub fn item_at(&self, index: usize) -> Option<ListEntry<'_, T>> {
        match self.items.get(index) {
            Some(item) => Some(ListEntry::Item(item)),
            None if index == self.items.len() => self.footer.as_ref().map(ListEntry::Footer),
            None => None,
        }
    }

    /// Iterate over all rows in display order
    pub fn entries(&self) -> impl Iterator<Item = ListEntry<'_, T>> {
        self.items
            .iter()
            .map(ListEntry::Item)
            .chain(self.footer.iter().map(ListEntry::Footer))
    }

    /// Data items only
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The footer, if present
    pub fn footer(&self) -> Option<&FooterState> {
        self.footer.as_ref()
    }

    /// Drain pending change notifications
    pub fn take_changes(&mut self) -> Vec<ListChange> {
        std::mem::take(&mut self.changes)
    }
}
