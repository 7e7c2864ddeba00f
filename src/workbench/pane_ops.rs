//! Pane operations for the Workbench.

use std::sync::Arc;

use tracing::{info, trace};

use super::{Workbench, WorkbenchError};
use crate::adapter::TerminalAdapter;
use crate::bridge::PtyBridge;
use crate::emulator::{ContainerSize, TerminalEmulator};
use crate::layout::{Layout, PaneId, SplitDirection};
use crate::session::SessionId;
use crate::settings::TerminalSettings;

impl<B: PtyBridge, E: TerminalEmulator> Workbench<B, E> {
    /// Splits the layout with a pane showing a brand-new session and focuses
    /// it. An established direction is kept.
    ///
    /// # Errors
    /// Returns error if the session cannot be created; the layout is then
    /// unchanged.
    pub async fn split(&mut self, direction: SplitDirection) -> Result<PaneId, WorkbenchError> {
        let id = self.spawn_session(None).await?;
        let pane_id = self.pane_ids.allocate();

        let project = self.registry.project().to_path_buf();
        let layout = self.layouts.entry(project).or_default();
        if layout.is_empty() {
            *layout = Layout::single(pane_id, id.clone());
        } else {
            layout.push_split(pane_id, id.clone(), direction);
        }

        let mut adapter = TerminalAdapter::new(Arc::clone(&self.bridge), id, &self.settings);
        adapter.mount();
        self.adapters.insert(pane_id, adapter);
        self.focus.on_split(pane_id);
        self.reconcile();

        info!("Split {:?}: new {}", direction, pane_id);
        Ok(pane_id)
    }

    /// Closes a pane and kills its session.
    ///
    /// Focus moves to the index-adjacent pane if the closed one had it. If
    /// the project is left without sessions a default one is created.
    /// Unknown panes are ignored.
    ///
    /// # Errors
    /// Returns error only if the replacement session cannot be created.
    pub async fn close_pane(&mut self, pane_id: PaneId) -> Result<(), WorkbenchError> {
        let Some(layout) = self.layouts.get_mut(self.registry.project()) else {
            return Ok(());
        };
        let Some((index, pane)) = layout.remove(pane_id) else {
            trace!("close_pane: ignoring unknown {}", pane_id);
            return Ok(());
        };

        if let Some(mut adapter) = self.adapters.remove(&pane_id) {
            adapter.dispose();
        }
        let was_focused = self.focus.is_focused(pane_id);
        self.focus.on_close(pane_id, index, layout);

        let session = pane.terminal_id;
        self.detach_panes(&session);
        self.retire(&session);

        // Focus moved to a survivor; its tab becomes active.
        if was_focused {
            if let Some(focused) = self.focused_session().cloned() {
                self.registry.set_active(&focused);
            }
        }

        info!("Closed {} ({})", pane_id, session);
        self.settle().await
    }

    /// Points a pane at another tab of the active project, keeping its id
    /// and size. Unknown panes or sessions are ignored.
    pub fn update_pane_terminal(&mut self, pane_id: PaneId, session: &SessionId) {
        if !self.registry.contains(session) {
            trace!("update_pane_terminal: ignoring unknown session {}", session);
            return;
        }
        let Some(layout) = self.layouts.get_mut(self.registry.project()) else {
            return;
        };
        if !layout.set_terminal(pane_id, session.clone()) {
            trace!("update_pane_terminal: ignoring unknown {}", pane_id);
            return;
        }
        if let Some(adapter) = self.adapters.get_mut(&pane_id) {
            adapter.rebind(session.clone());
        }
    }

    /// Shows the active tab in the focused pane.
    pub fn show_active_in_focused(&mut self) {
        let (Some(pane), Some(active)) = (self.focus.focused(), self.active_terminal().cloned())
        else {
            return;
        };
        self.update_pane_terminal(pane, &active);
    }

    /// Drags resize handle `handle` (between pane `handle` and `handle + 1`)
    /// by `delta` weight units. Returns true if sizes changed.
    pub fn resize_panes(&mut self, handle: usize, delta: f32) -> bool {
        match self.layouts.get_mut(self.registry.project()) {
            Some(layout) => layout.resize_handle(handle, delta),
            None => false,
        }
    }

    /// Grows the focused pane by `delta` weight units (shrinks if negative),
    /// taking from or giving to its next neighbour (the previous one for the
    /// last pane).
    pub fn resize_focused_pane(&mut self, delta: f32) -> bool {
        let Some(focused) = self.focus.focused() else {
            return false;
        };
        let Some(layout) = self.layouts.get_mut(self.registry.project()) else {
            return false;
        };
        let Some(index) = layout.index_of(focused) else {
            return false;
        };

        if index + 1 < layout.len() {
            layout.resize_handle(index, delta)
        } else if index > 0 {
            layout.resize_handle(index - 1, -delta)
        } else {
            false
        }
    }

    /// Focuses a pane and activates its tab. Unknown panes are ignored.
    pub fn set_focused_pane(&mut self, pane_id: PaneId) {
        let Some(session) = self
            .layout()
            .and_then(|layout| layout.get(pane_id))
            .map(|p| p.terminal_id.clone())
        else {
            trace!("set_focused_pane: ignoring unknown {}", pane_id);
            return;
        };
        self.focus.set(pane_id);
        self.registry.set_active(&session);
    }

    /// Focuses the next pane, wrapping around.
    pub fn focus_next_pane(&mut self) {
        self.cycle_focus(true);
    }

    /// Focuses the previous pane, wrapping around.
    pub fn focus_prev_pane(&mut self) {
        self.cycle_focus(false);
    }

    fn cycle_focus(&mut self, forward: bool) {
        let Some(layout) = self.layouts.get(self.registry.project()) else {
            return;
        };
        if let Some(pane) = self.focus.cycle(layout, forward) {
            self.set_focused_pane(pane);
        }
    }

    /// Fits a pane's emulator to its container. Returns true on success.
    pub fn fit_pane(&mut self, pane_id: PaneId, container: ContainerSize) -> bool {
        match self.adapters.get_mut(&pane_id) {
            Some(adapter) => adapter.fit(container),
            None => false,
        }
    }

    /// Fits every listed pane, e.g. after the window was resized.
    pub fn fit_all(&mut self, containers: &[(PaneId, ContainerSize)]) {
        for (pane_id, container) in containers {
            self.fit_pane(*pane_id, *container);
        }
    }

    /// Sends keystrokes to a pane's session.
    pub fn send_input(&self, pane_id: PaneId, data: &[u8]) {
        if let Some(adapter) = self.adapters.get(&pane_id) {
            adapter.input(data);
        }
    }

    /// Sends keystrokes to the focused pane's session.
    pub fn send_to_focused(&self, data: &[u8]) {
        if let Some(pane) = self.focus.focused() {
            self.send_input(pane, data);
        }
    }

    /// Applies new preferences to every live pane in place.
    pub fn apply_settings(&mut self, settings: TerminalSettings) {
        for adapter in self.adapters.values_mut() {
            adapter.apply_settings(&settings);
        }
        self.settings = settings;
        info!("Applied terminal settings to {} pane(s)", self.adapters.len());
    }
}
