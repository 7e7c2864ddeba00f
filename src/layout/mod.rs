//! Pane layout: one split direction plus a flat, ordered list of panes.
//!
//! The layout is deliberately single-level. Order drives rendering
//! (left-to-right or top-to-bottom) and resize-handle adjacency: handle `i`
//! sits between pane `i` and pane `i + 1`.
//!
//! ```text
//! Horizontal                 Vertical
//! ┌──────┬──────┬──────┐     ┌────────────┐
//! │  0   │  1   │  2   │     │     0      │
//! │      │      │      │     ├────────────┤
//! └──────┴──────┴──────┘     │     1      │
//!        ^      ^            └────────────┘
//!     handle 0  handle 1
//! ```

mod types;

pub use types::{
    MIN_PANE_WEIGHT, Pane, PaneId, PaneIdAllocator, SplitDirection, TOTAL_WEIGHT,
};

use crate::session::SessionId;

/// Split arrangement of one project's panes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    direction: SplitDirection,
    panes: Vec<Pane>,
}

impl Layout {
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-pane layout.
    #[must_use]
    pub fn single(id: PaneId, terminal_id: SessionId) -> Self {
        Self {
            direction: SplitDirection::None,
            panes: vec![Pane {
                id,
                terminal_id,
                size: TOTAL_WEIGHT,
            }],
        }
    }

    /// Builds a layout from saved parts, normalizing weights and direction.
    #[must_use]
    pub fn from_parts(direction: SplitDirection, panes: Vec<Pane>) -> Self {
        let mut layout = Self { direction, panes };
        layout.normalize();
        layout
    }

    /// Returns the split direction.
    #[must_use]
    pub const fn direction(&self) -> SplitDirection {
        self.direction
    }

    /// Returns the panes in render order.
    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Returns the number of panes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Returns true if there are no panes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Returns true when the layout renders as a single-pane view.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.direction.is_none() || self.panes.len() <= 1
    }

    /// Looks up a pane.
    #[must_use]
    pub fn get(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == id)
    }

    /// Returns the render position of a pane.
    #[must_use]
    pub fn index_of(&self, id: PaneId) -> Option<usize> {
        self.panes.iter().position(|p| p.id == id)
    }

    /// Appends a pane for a freshly created session and gives every pane an
    /// equal share.
    ///
    /// The requested direction only applies when the layout has none yet;
    /// an established direction is kept rather than mixed.
    pub fn push_split(&mut self, id: PaneId, terminal_id: SessionId, direction: SplitDirection) {
        if self.direction.is_none() {
            self.direction = match direction {
                SplitDirection::None => SplitDirection::Horizontal,
                other => other,
            };
        }

        self.panes.push(Pane {
            id,
            terminal_id,
            size: 0.0,
        });
        self.equalize();

        if self.panes.len() <= 1 {
            self.direction = SplitDirection::None;
        }
    }

    /// Removes a pane, returning its former index and the pane.
    ///
    /// Survivors are rescaled to keep the total weight; one or zero
    /// survivors revert the layout to the single-pane view.
    pub fn remove(&mut self, id: PaneId) -> Option<(usize, Pane)> {
        let index = self.index_of(id)?;
        let pane = self.panes.remove(index);
        self.normalize();
        Some((index, pane))
    }

    /// Points a pane at another session, keeping its id and weight.
    pub fn set_terminal(&mut self, id: PaneId, terminal_id: SessionId) -> bool {
        match self.panes.iter_mut().find(|p| p.id == id) {
            Some(pane) => {
                pane.terminal_id = terminal_id;
                true
            }
            None => false,
        }
    }

    /// Drags resize handle `handle` by `delta` weight units.
    ///
    /// Positive deltas grow the pane before the handle. Both neighbours stay
    /// at or above [`MIN_PANE_WEIGHT`]. Returns true if weights changed.
    pub fn resize_handle(&mut self, handle: usize, delta: f32) -> bool {
        if self.is_single() || handle + 1 >= self.panes.len() || delta == 0.0 {
            return false;
        }

        let before = self.panes[handle].size;
        let after = self.panes[handle + 1].size;
        let pair = before + after;

        let floor = MIN_PANE_WEIGHT.min(pair / 2.0);
        let new_before = (before + delta).clamp(floor, pair - floor);
        if (new_before - before).abs() < f32::EPSILON {
            return false;
        }

        self.panes[handle].size = new_before;
        self.panes[handle + 1].size = pair - new_before;
        true
    }

    /// Drops every pane whose session fails `keep`, returning the dropped
    /// panes. Used to elide panes of closed or foreign sessions.
    pub fn retain_sessions(&mut self, mut keep: impl FnMut(&SessionId) -> bool) -> Vec<Pane> {
        let (kept, dropped): (Vec<Pane>, Vec<Pane>) = std::mem::take(&mut self.panes)
            .into_iter()
            .partition(|p| keep(&p.terminal_id));
        self.panes = kept;
        if !dropped.is_empty() {
            self.normalize();
        }
        dropped
    }

    /// Gives every pane the same weight.
    pub fn equalize(&mut self) {
        if self.panes.is_empty() {
            return;
        }
        let share = TOTAL_WEIGHT / self.panes.len() as f32;
        for pane in &mut self.panes {
            pane.size = share;
        }
    }

    /// Rescales weights to sum to [`TOTAL_WEIGHT`] and fixes the direction
    /// for layouts with one pane or fewer.
    fn normalize(&mut self) {
        if self.panes.len() <= 1 {
            self.direction = SplitDirection::None;
        }

        let total: f32 = self.panes.iter().map(|p| p.size.max(0.0)).sum();
        if total <= f32::EPSILON {
            self.equalize();
            return;
        }

        let scale = TOTAL_WEIGHT / total;
        for pane in &mut self.panes {
            pane.size = pane.size.max(0.0) * scale;
        }
    }
}
