//! Snapshot and restore operations for the Workbench.

use tracing::{info, warn};

use super::{Workbench, WorkbenchError};
use crate::bridge::PtyBridge;
use crate::emulator::TerminalEmulator;
use crate::layout::{Layout, Pane};
use crate::session::SessionId;
use crate::snapshot::{PaneEntry, SessionEntry, SNAPSHOT_VERSION, WorkspaceSnapshot};

impl<B: PtyBridge, E: TerminalEmulator> Workbench<B, E> {
    /// Captures the active project's tabs and layout.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let sessions: Vec<SessionEntry> = self
            .registry
            .sessions()
            .map(|s| SessionEntry {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect();

        let index_of = |id: &SessionId| sessions.iter().position(|s| &s.id == id);

        let (direction, panes, focused_pane_index) = match self.layout() {
            Some(layout) => {
                let panes: Vec<_> = layout
                    .panes()
                    .iter()
                    .filter_map(|pane| {
                        index_of(&pane.terminal_id).map(|session_index| (pane.id, PaneEntry {
                            session_index,
                            size: pane.size,
                        }))
                    })
                    .collect();
                let focused = panes
                    .iter()
                    .position(|(id, _)| self.focus.is_focused(*id));
                (
                    layout.direction(),
                    panes.into_iter().map(|(_, entry)| entry).collect(),
                    focused,
                )
            }
            None => (Default::default(), Vec::new(), None),
        };

        let active_session_index = self.registry.active_terminal().and_then(index_of);

        WorkspaceSnapshot {
            version: SNAPSHOT_VERSION,
            project_path: self.registry.project().to_path_buf(),
            direction,
            panes,
            sessions,
            focused_pane_index,
            active_session_index,
        }
    }

    /// Rebuilds a saved workspace.
    ///
    /// Switches to the snapshot's project, creates one new session per saved
    /// tab (same names, new ids), then replaces the project's layout with the
    /// saved panes pointed at the new ids. Panes referring to tabs that could
    /// not be recreated are dropped.
    ///
    /// # Errors
    /// Returns error if the snapshot has no tabs or a session cannot be
    /// created. Tabs created before the failure are kept. If none could be
    /// created the workbench is left as it was, on its previous project.
    pub async fn restore(&mut self, snapshot: &WorkspaceSnapshot) -> Result<(), WorkbenchError> {
        if snapshot.sessions.is_empty() {
            return Err(WorkbenchError::NoSessions(snapshot.project_path.clone()));
        }

        let previous = self.registry.project().to_path_buf();
        let switched = snapshot.project_path != previous;
        if switched {
            self.enter_project(snapshot.project_path.clone());
        }

        let mut ids = Vec::with_capacity(snapshot.sessions.len());
        let mut failure = None;
        for entry in &snapshot.sessions {
            match self.spawn_session(Some(&entry.name)).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if ids.is_empty() {
            if switched {
                info!("Restore failed, returning to {}", previous.display());
                self.enter_project(previous);
            }
            self.reconcile();
            return match failure {
                Some(e) => Err(e),
                None => Ok(()),
            };
        }

        self.release_adapters();
        let panes: Vec<(usize, Pane)> = snapshot
            .panes
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                ids.get(entry.session_index).map(|id| {
                    let pane = Pane {
                        id: self.pane_ids.allocate(),
                        terminal_id: id.clone(),
                        size: entry.size,
                    };
                    (index, pane)
                })
            })
            .collect();
        if panes.len() < snapshot.panes.len() {
            warn!(
                "Dropped {} pane(s) whose session could not be restored",
                snapshot.panes.len() - panes.len()
            );
        }

        // Saved indices count the dropped panes too.
        let focused = snapshot.focused_pane_index.and_then(|wanted| {
            panes
                .iter()
                .find(|(index, _)| *index == wanted)
                .map(|(_, pane)| pane.id)
        });
        let layout = Layout::from_parts(
            snapshot.direction,
            panes.into_iter().map(|(_, pane)| pane).collect(),
        );
        self.layouts
            .insert(self.registry.project().to_path_buf(), layout);

        if let Some(id) = snapshot.active_session_index.and_then(|index| ids.get(index)) {
            self.registry.set_active(id);
        }
        self.focus.clear();
        if let Some(pane) = focused {
            self.focus.set(pane);
        }
        self.reconcile();

        info!(
            "Restored {} session(s) in {}",
            ids.len(),
            self.registry.project().display()
        );
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
