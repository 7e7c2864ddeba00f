//! Focus controller: which single pane is the user's interaction target.
//!
//! Focus is advisory. It drives styling and shortcut targeting but never
//! gates input; each pane's adapter owns its own input path.

use crate::layout::{Layout, PaneId};

/// Tracks the focused pane of the visible layout.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    focused: Option<PaneId>,
}

impl FocusController {
    /// Creates a controller with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the focused pane.
    #[must_use]
    pub const fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    /// Returns true if `pane` holds focus.
    #[must_use]
    pub fn is_focused(&self, pane: PaneId) -> bool {
        self.focused == Some(pane)
    }

    /// Focuses `pane`. Callers validate that it exists.
    pub fn set(&mut self, pane: PaneId) {
        self.focused = Some(pane);
    }

    /// Clears focus.
    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// A split always focuses the new pane.
    pub fn on_split(&mut self, new_pane: PaneId) {
        self.focused = Some(new_pane);
    }

    /// Moves focus after `closed` was removed from `layout` at `index`.
    ///
    /// Focus only moves if the closed pane held it. The survivor that slid
    /// into the closed slot wins; past the end, the new last pane does.
    pub fn on_close(&mut self, closed: PaneId, index: usize, layout: &Layout) {
        if self.focused != Some(closed) {
            return;
        }
        self.focused = Self::adjacent(layout, index);
    }

    /// Points focus at a valid pane if it no longer refers to one.
    pub fn repair(&mut self, layout: &Layout) {
        let valid = self.focused.is_some_and(|id| layout.get(id).is_some());
        if !valid {
            self.focused = layout.panes().first().map(|p| p.id);
        }
    }

    /// Moves focus to the next or previous pane, wrapping around.
    pub fn cycle(&mut self, layout: &Layout, forward: bool) -> Option<PaneId> {
        let len = layout.len();
        if len == 0 {
            self.focused = None;
            return None;
        }

        let current = self.focused.and_then(|id| layout.index_of(id));
        let next = match current {
            Some(i) if forward => (i + 1) % len,
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };

        self.focused = layout.panes().get(next).map(|p| p.id);
        self.focused
    }

    fn adjacent(layout: &Layout, index: usize) -> Option<PaneId> {
        let panes = layout.panes();
        if panes.is_empty() {
            return None;
        }
        panes.get(index.min(panes.len() - 1)).map(|p| p.id)
    }
}
