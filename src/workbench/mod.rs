//! The workbench: session registry, per-project layouts, focus and the
//! pane adapters, kept consistent with each other.
//!
//! All structural changes go through the operations in the `*_ops` modules.
//! After each one the visible layout is reconciled: panes of closed or
//! foreign sessions are elided, an empty layout is seeded with the active
//! session, a lone pane follows the active session, focus is repaired and
//! every pane has a mounted adapter.

mod pane_ops;
mod project_ops;
mod session_ops;
mod snapshot_ops;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::adapter::TerminalAdapter;
use crate::bridge::{BridgeError, PtyBridge, PtyStatus, Subscription};
use crate::emulator::{ScreenBuffer, TerminalEmulator};
use crate::focus::FocusController;
use crate::layout::{Layout, Pane, PaneId, PaneIdAllocator};
use crate::session::{Session, SessionId, SessionRegistry, SessionStatus, TabInfo};
use crate::settings::TerminalSettings;

/// Workbench error type.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// The bridge could not create a session. Nothing was committed.
    #[error("Failed to create terminal session: {0}")]
    Creation(#[from] BridgeError),

    /// A snapshot or project had no sessions to work with.
    #[error("No sessions for project {}", .0.display())]
    NoSessions(PathBuf),
}

/// A pane as the renderer sees it.
#[derive(Debug, Clone, Copy)]
pub struct PaneView<'a> {
    /// The pane.
    pub pane: &'a Pane,
    /// The session it shows, if still known.
    pub session: Option<&'a Session>,
    /// True if the pane has focus.
    pub focused: bool,
}

/// Terminal session and pane-layout engine.
pub struct Workbench<B: PtyBridge, E: TerminalEmulator = ScreenBuffer> {
    bridge: Arc<B>,
    registry: SessionRegistry,
    layouts: HashMap<PathBuf, Layout>,
    focus: FocusController,
    saved_focus: HashMap<PathBuf, PaneId>,
    adapters: HashMap<PaneId, TerminalAdapter<B, E>>,
    settings: TerminalSettings,
    pane_ids: PaneIdAllocator,
    status_rx: mpsc::Receiver<PtyStatus>,
    _status_sub: Subscription,
}

impl<B: PtyBridge, E: TerminalEmulator> Workbench<B, E> {
    /// Creates a workbench with no sessions yet.
    pub fn new(bridge: Arc<B>, project: impl Into<PathBuf>, settings: TerminalSettings) -> Self {
        let (tx, status_rx) = mpsc::channel();
        let status_sub = bridge.on_status_change(move |event| {
            let _ = tx.send(event.clone());
        });

        Self {
            bridge,
            registry: SessionRegistry::new(project),
            layouts: HashMap::new(),
            focus: FocusController::new(),
            saved_focus: HashMap::new(),
            adapters: HashMap::new(),
            settings,
            pane_ids: PaneIdAllocator::new(),
            status_rx,
            _status_sub: status_sub,
        }
    }

    /// Creates a workbench whose project starts with one default session.
    ///
    /// # Errors
    /// Returns error if the first session cannot be created.
    pub async fn open(
        bridge: Arc<B>,
        project: impl Into<PathBuf>,
        settings: TerminalSettings,
    ) -> Result<Self, WorkbenchError> {
        let mut workbench = Self::new(bridge, project, settings);
        workbench.create_session(None).await?;
        Ok(workbench)
    }

    /// Returns the bridge.
    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    /// Returns the session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Returns the active project.
    pub fn project(&self) -> &Path {
        self.registry.project()
    }

    /// Returns the sessions of the active project in tab order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.registry.sessions()
    }

    /// Returns the active session id of the active project.
    pub fn active_terminal(&self) -> Option<&SessionId> {
        self.registry.active_terminal()
    }

    /// Returns tab bar rows.
    pub fn tab_info(&self) -> Vec<TabInfo> {
        self.registry.tab_info()
    }

    /// Returns the active project's layout.
    pub fn layout(&self) -> Option<&Layout> {
        self.layouts.get(self.registry.project())
    }

    /// Returns the focused pane.
    pub fn focused_pane(&self) -> Option<PaneId> {
        self.focus.focused()
    }

    /// Returns the session shown by the focused pane.
    pub fn focused_session(&self) -> Option<&SessionId> {
        let focused = self.focus.focused()?;
        self.layout()?.get(focused).map(|p| &p.terminal_id)
    }

    /// Returns the adapter of a pane.
    pub fn adapter(&self, pane: PaneId) -> Option<&TerminalAdapter<B, E>> {
        self.adapters.get(&pane)
    }

    /// Returns the number of live adapters.
    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Returns the current terminal preferences.
    pub fn settings(&self) -> &TerminalSettings {
        &self.settings
    }

    /// Panes of the active project whose session still belongs to it, in
    /// render order.
    pub fn visible_panes(&self) -> Vec<PaneView<'_>> {
        let Some(layout) = self.layout() else {
            return Vec::new();
        };
        layout
            .panes()
            .iter()
            .filter(|pane| self.registry.contains(&pane.terminal_id))
            .map(|pane| PaneView {
                pane,
                session: self.registry.get(&pane.terminal_id),
                focused: self.focus.is_focused(pane.id),
            })
            .collect()
    }

    /// Applies pending busy/idle events from the bridge. Returns how many
    /// were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.status_rx.try_recv() {
            let status = if event.busy {
                SessionStatus::Busy
            } else if self.registry.active_terminal() == Some(&event.session) {
                SessionStatus::Active
            } else {
                SessionStatus::Idle
            };
            if self.registry.set_status(&event.session, status) {
                applied += 1;
            }
        }
        applied
    }

    /// Brings the active project's layout in line with the registry.
    fn reconcile(&mut self) {
        let project = self.registry.project().to_path_buf();
        let layout = self.layouts.entry(project).or_default();
        let registry = &self.registry;
        let active = registry.active_terminal().cloned();

        // A lone pane shows whatever tab is active.
        if layout.len() == 1 {
            if let (Some(active), Some(pane)) = (&active, layout.panes().first()) {
                if &pane.terminal_id != active {
                    let pane_id = pane.id;
                    layout.set_terminal(pane_id, active.clone());
                    if let Some(adapter) = self.adapters.get_mut(&pane_id) {
                        adapter.rebind(active.clone());
                    }
                }
            }
        }

        for pane in layout.retain_sessions(|id| registry.contains(id)) {
            debug!("Eliding stale {} ({})", pane.id, pane.terminal_id);
            if let Some(mut adapter) = self.adapters.remove(&pane.id) {
                adapter.dispose();
            }
        }

        if layout.is_empty() {
            if let Some(active) = active {
                *layout = Layout::single(self.pane_ids.allocate(), active);
            }
        }

        self.focus.repair(layout);

        for pane in layout.panes() {
            self.adapters.entry(pane.id).or_insert_with(|| {
                let mut adapter = TerminalAdapter::new(
                    Arc::clone(&self.bridge),
                    pane.terminal_id.clone(),
                    &self.settings,
                );
                adapter.mount();
                adapter
            });
        }
    }

    /// Disposes the adapters of every pane in the active project's layout.
    fn release_adapters(&mut self) {
        let Some(layout) = self.layouts.get(self.registry.project()) else {
            return;
        };
        for pane in layout.panes() {
            if let Some(mut adapter) = self.adapters.remove(&pane.id) {
                adapter.dispose();
            }
        }
    }

    /// Creates a session in the active project without touching the layout.
    async fn spawn_session(&mut self, name: Option<&str>) -> Result<SessionId, WorkbenchError> {
        let cwd = self.registry.project().to_path_buf();
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| self.registry.next_default_name());

        match self.bridge.create(&cwd, Some(&name)).await {
            Ok(id) => {
                self.registry.insert(id.clone(), Some(name.clone()));
                info!("Created session {} '{}' in {}", id, name, cwd.display());
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create session in {}: {}", cwd.display(), e);
                Err(WorkbenchError::Creation(e))
            }
        }
    }

    /// Synthesizes the default session if the active project has none, then
    /// reconciles.
    async fn settle(&mut self) -> Result<(), WorkbenchError> {
        let result = if self.registry.needs_default_session() {
            info!(
                "No sessions left in {}, creating a replacement",
                self.registry.project().display()
            );
            self.spawn_session(None).await.map(|_| ())
        } else {
            Ok(())
        };
        self.reconcile();
        result
    }
}
