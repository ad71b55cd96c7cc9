//! Near-end-of-list detection
//!
//! Turns a viewport position into a "load more" signal. The trigger does not
//! look at loading state; the pagination controller drops signals it cannot
//! act on.

use serde::{Deserialize, Serialize};

/// Visible window of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Index of the first visible row
    pub first_visible: usize,
    /// Number of visible rows
    pub visible_count: usize,
}

impl Viewport {
    /// Create a viewport
    pub fn new(first_visible: usize, visible_count: usize) -> Self {
        Self {
            first_visible,
            visible_count,
        }
    }

    /// Viewport scrolled so the last `visible_count` rows of `total_rows` show
    pub fn at_end(total_rows: usize, visible_count: usize) -> Self {
        Self {
            first_visible: total_rows.saturating_sub(visible_count),
            visible_count,
        }
    }
}

/// Detects when a viewport is close enough to the end to prefetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollTrigger {
    /// Rows before the end at which the trigger fires
    #[serde(default)]
    pub prefetch_distance: usize,
}

impl ScrollTrigger {
    /// Create a trigger firing `prefetch_distance` rows before the end
    pub fn new(prefetch_distance: usize) -> Self {
        Self { prefetch_distance }
    }

    /// Whether `viewport` is near the end of a list with `total_rows` rows
    pub fn is_near_end(&self, viewport: Viewport, total_rows: usize) -> bool {
        total_rows > 0
            && viewport
                .first_visible
                .saturating_add(viewport.visible_count)
                .saturating_add(self.prefetch_distance)
                >= total_rows
    }
}
