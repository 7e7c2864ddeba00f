//! Project switching for the Workbench.

use std::path::PathBuf;

use tracing::info;

use super::{Workbench, WorkbenchError};
use crate::bridge::PtyBridge;
use crate::emulator::TerminalEmulator;

impl<B: PtyBridge, E: TerminalEmulator> Workbench<B, E> {
    /// Makes `project` the active project.
    ///
    /// The panes of the project being left lose their adapters, but its
    /// sessions keep running and its layout is kept for when it returns. A
    /// project without sessions gets a default one.
    ///
    /// # Errors
    /// Returns error if the default session cannot be created. The switch
    /// itself still happens.
    pub async fn switch_project(
        &mut self,
        project: impl Into<PathBuf>,
    ) -> Result<(), WorkbenchError> {
        let project = project.into();
        if project.as_path() == self.registry.project() {
            return Ok(());
        }

        self.enter_project(project);
        self.settle().await
    }

    /// Leaves the active project for `project`.
    ///
    /// Adapters of the project being left are disposed and its focus is
    /// remembered; `project` gets back the focus it had when it was left.
    pub(super) fn enter_project(&mut self, project: PathBuf) {
        self.release_adapters();
        if let Some(focused) = self.focus.focused() {
            self.saved_focus
                .insert(self.registry.project().to_path_buf(), focused);
        }

        info!(
            "Switching project {} -> {}",
            self.registry.project().display(),
            project.display()
        );
        self.registry.set_project(project.clone());

        self.focus.clear();
        if let Some(focused) = self.saved_focus.remove(&project) {
            self.focus.set(focused);
        }
    }
}
