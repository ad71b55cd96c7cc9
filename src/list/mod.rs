//! List model module
//!
//! An ordered list of data items with an optional trailing footer row.
//!
//! # Overview
//!
//! The footer is a transient, non-data row at the end of the list that shows
//! either a loading indicator or a retry prompt. Items and the footer are
//! stored separately, so the list can hold at most one footer and it is
//! always the last row. Every mutation records a [`ListChange`] that a view
//! layer drains to update itself incrementally.

mod model;

pub use model::{FooterState, ListChange, ListEntry, ListModel};

#[cfg(test)]
mod tests;
