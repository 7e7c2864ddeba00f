//! Input handling for the application.
//!
//! Bound keys run workbench commands; everything else goes to the focused
//! pane's session.

use crossterm::event::{KeyEvent, KeyEventKind};
use tracing::warn;

use crate::bridge::PtyBridge;
use crate::config::Config;
use crate::layout::SplitDirection;
use crate::workbench::WorkbenchError;

use super::keymap::{Command, command_for, key_to_bytes};
use super::{App, RESIZE_STEP};

impl<B: PtyBridge> App<B> {
    /// Handles a key event.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match command_for(key) {
            Some(command) => self.execute(command).await,
            None => {
                let bytes = key_to_bytes(key);
                if !bytes.is_empty() {
                    self.workbench.send_to_focused(&bytes);
                }
            }
        }
    }

    /// Runs a command against the workbench.
    pub async fn execute(&mut self, command: Command) {
        let result = match command {
            Command::NewTab => self.workbench.create_session(None).await.map(|_| ()),
            Command::CloseTab => match self.workbench.active_terminal().cloned() {
                Some(id) => self.workbench.close_session(&id).await,
                None => Ok(()),
            },
            Command::NextTab => {
                self.workbench.next_session();
                Ok(())
            }
            Command::PrevTab => {
                self.workbench.prev_session();
                Ok(())
            }
            Command::SelectTab(index) => {
                self.workbench.select_session(index);
                Ok(())
            }
            Command::SplitHorizontal => self
                .workbench
                .split(SplitDirection::Horizontal)
                .await
                .map(|_| ()),
            Command::SplitVertical => self
                .workbench
                .split(SplitDirection::Vertical)
                .await
                .map(|_| ()),
            Command::ClosePane => match self.workbench.focused_pane() {
                Some(pane) => self.workbench.close_pane(pane).await,
                None => Ok(()),
            },
            Command::FocusNext => {
                self.workbench.focus_next_pane();
                Ok(())
            }
            Command::FocusPrev => {
                self.workbench.focus_prev_pane();
                Ok(())
            }
            Command::GrowPane => {
                self.workbench.resize_focused_pane(RESIZE_STEP);
                Ok(())
            }
            Command::ShrinkPane => {
                self.workbench.resize_focused_pane(-RESIZE_STEP);
                Ok(())
            }
            Command::ShowActiveInPane => {
                self.workbench.show_active_in_focused();
                Ok(())
            }
            Command::ReloadConfig => {
                self.reload_config();
                Ok(())
            }
            Command::Quit => {
                self.quit();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    fn reload_config(&mut self) {
        let path = self.config.config_path.clone();
        match Config::load_from(&path) {
            Ok(config) => {
                if config.terminal.shell != self.config.terminal.shell {
                    self.shell_change = Some(config.terminal.shell);
                }
                self.workbench.apply_settings(config.terminal_settings());
                self.config = config;
                self.invalidate_fits();
                self.set_status("Configuration reloaded");
            }
            Err(e) => {
                warn!("Config reload failed: {}", e);
                self.set_status(format!("Config reload failed: {e}"));
            }
        }
    }

    fn report(&mut self, error: &WorkbenchError) {
        self.set_status(format!("Error: {error}"));
    }
}
