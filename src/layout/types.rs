//! Pane layout types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Sum of all pane weights in a layout.
pub const TOTAL_WEIGHT: f32 = 100.0;

/// Smallest weight a pane can be dragged down to.
pub const MIN_PANE_WEIGHT: f32 = 10.0;

/// Stable pane identifier, independent of the session it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(u64);

impl PaneId {
    /// Creates a pane id from its raw number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane-{}", self.0)
    }
}

/// Root split direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Single-pane view, no resize handles.
    #[default]
    None,
    /// Panes side by side, left to right.
    Horizontal,
    /// Panes stacked, top to bottom.
    Vertical,
}

impl SplitDirection {
    /// Returns true for `None`.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// One visible rectangle in the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    /// Stable pane identifier.
    pub id: PaneId,
    /// Session currently displayed.
    pub terminal_id: SessionId,
    /// Relative weight; siblings sum to [`TOTAL_WEIGHT`].
    pub size: f32,
}

/// Hands out pane ids that are never reused.
#[derive(Debug, Clone, Default)]
pub struct PaneIdAllocator {
    next: u64,
}

impl PaneIdAllocator {
    /// Creates an allocator whose first id is `pane-1`.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns a fresh pane id.
    pub fn allocate(&mut self) -> PaneId {
        let id = PaneId(self.next.max(1));
        self.next = id.0 + 1;
        id
    }
}
