//! Tab (session) operations for the Workbench.

use tracing::{info, trace, warn};

use super::{Workbench, WorkbenchError};
use crate::bridge::PtyBridge;
use crate::emulator::TerminalEmulator;
use crate::session::{Session, SessionId, SessionStatus};

impl<B: PtyBridge, E: TerminalEmulator> Workbench<B, E> {
    /// Opens a new tab in the active project and makes it active.
    ///
    /// In the single-pane view the pane switches to the new tab.
    ///
    /// # Errors
    /// Returns error if the bridge cannot create the session; the registry
    /// and layout are then unchanged.
    pub async fn create_session(
        &mut self,
        name: Option<&str>,
    ) -> Result<SessionId, WorkbenchError> {
        let id = self.spawn_session(name).await?;
        self.reconcile();
        Ok(id)
    }

    /// Closes a tab of the active project.
    ///
    /// Panes showing it are closed (a lone pane switches to the next active
    /// tab instead), the process is killed, and if it was the project's last
    /// tab a fresh `Terminal 1` takes its place. A closed active tab hands
    /// over to the tab of the pane that receives focus. Unknown ids are
    /// ignored.
    ///
    /// # Errors
    /// Returns error only if the replacement session cannot be created.
    pub async fn close_session(&mut self, id: &SessionId) -> Result<(), WorkbenchError> {
        if !self.registry.contains(id) {
            trace!("close_session: ignoring unknown session {}", id);
            return Ok(());
        }

        let was_active = self.registry.active_terminal() == Some(id);
        self.detach_panes(id);
        self.retire(id);

        // The focused pane's tab takes over from a closed active tab.
        if was_active {
            if let Some(focused) = self.focused_session().cloned() {
                self.registry.set_active(&focused);
            }
        }
        self.settle().await
    }

    /// Makes a tab active. Unknown ids are ignored.
    ///
    /// Focus moves to a pane showing the tab, if any.
    pub fn set_active_session(&mut self, id: &SessionId) {
        if !self.registry.set_active(id) {
            return;
        }
        self.focus_pane_showing(id);
        self.reconcile();
    }

    /// Renames a tab. Unknown ids are ignored.
    pub fn rename_session(&mut self, id: &SessionId, name: &str) {
        if self.registry.rename(id, name) {
            info!("Renamed session {} to '{}'", id, name);
        }
    }

    /// Sets a tab's status directly. Unknown ids are ignored.
    pub fn set_status(&mut self, id: &SessionId, status: SessionStatus) {
        self.registry.set_status(id, status);
    }

    /// Returns the tab at `index` in the active project.
    pub fn session_at(&self, index: usize) -> Option<&Session> {
        self.registry.session_at(index)
    }

    /// Activates the tab at `index`, if there is one.
    pub fn select_session(&mut self, index: usize) {
        if let Some(id) = self.registry.session_at(index).map(|s| s.id.clone()) {
            self.set_active_session(&id);
        }
    }

    /// Activates the next tab, wrapping around.
    pub fn next_session(&mut self) {
        self.cycle_session(true);
    }

    /// Activates the previous tab, wrapping around.
    pub fn prev_session(&mut self) {
        self.cycle_session(false);
    }

    fn cycle_session(&mut self, forward: bool) {
        if let Some(id) = self.registry.cycle(forward) {
            self.focus_pane_showing(&id);
            self.reconcile();
        }
    }

    fn focus_pane_showing(&mut self, id: &SessionId) {
        let pane = self
            .layout()
            .and_then(|layout| layout.panes().iter().find(|p| &p.terminal_id == id))
            .map(|p| p.id);
        if let Some(pane) = pane {
            self.focus.set(pane);
        }
    }

    /// Closes every pane showing `id`, except a lone pane.
    pub(super) fn detach_panes(&mut self, id: &SessionId) {
        let Some(layout) = self.layouts.get_mut(self.registry.project()) else {
            return;
        };

        let showing: Vec<_> = layout
            .panes()
            .iter()
            .filter(|p| &p.terminal_id == id)
            .map(|p| p.id)
            .collect();

        for pane_id in showing {
            if layout.len() <= 1 {
                break;
            }
            if let Some((index, _)) = layout.remove(pane_id) {
                if let Some(mut adapter) = self.adapters.remove(&pane_id) {
                    adapter.dispose();
                }
                self.focus.on_close(pane_id, index, layout);
            }
        }
    }

    /// Kills a session and drops it from the registry. A failed kill is
    /// logged and the removal goes ahead.
    pub(super) fn retire(&mut self, id: &SessionId) {
        if let Err(e) = self.bridge.kill(id) {
            warn!("Kill of {} failed, removing anyway: {}", id, e);
        }
        if let Some(removal) = self.registry.remove(id) {
            info!(
                "Closed session {} '{}'",
                removal.session.id, removal.session.name
            );
        }
    }
}
