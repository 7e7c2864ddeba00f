//! Main application state and event handling.
//!
//! Drives a [`Workbench`] from crossterm events and renders it with ratatui.

mod input;
pub mod keymap;
mod render;

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::layout::Rect;

use crate::bridge::PtyBridge;
use crate::config::{Config, ShellType};
use crate::emulator::{CellMetrics, ContainerSize};
use crate::layout::PaneId;
use crate::workbench::Workbench;

pub use keymap::Command;

/// Event poll timeout in milliseconds.
const POLL_TIMEOUT_MS: u64 = 50;

/// Weight units moved by one grow/shrink keystroke.
pub const RESIZE_STEP: f32 = 5.0;

/// Application state.
pub struct App<B: PtyBridge> {
    workbench: Workbench<B>,
    config: Config,
    running: bool,
    status: String,
    /// Content rects each pane was last fitted to.
    fitted: HashMap<PaneId, Rect>,
    /// Shell chosen by the last config reload, for the bridge to pick up.
    shell_change: Option<ShellType>,
}

impl<B: PtyBridge> App<B> {
    /// Creates an application around a workbench.
    pub fn new(workbench: Workbench<B>, config: Config) -> Self {
        Self {
            workbench,
            config,
            running: true,
            status: String::new(),
            fitted: HashMap::new(),
            shell_change: None,
        }
    }

    /// Returns true until quit.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stops the main loop.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Returns the workbench.
    pub fn workbench(&self) -> &Workbench<B> {
        &self.workbench
    }

    /// Returns the workbench mutably.
    pub fn workbench_mut(&mut self) -> &mut Workbench<B> {
        &mut self.workbench
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the status line text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sets the status line text.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Returns the shell picked by a config reload, once.
    pub fn take_shell_change(&mut self) -> Option<ShellType> {
        self.shell_change.take()
    }

    /// Processes pending events.
    ///
    /// # Errors
    /// Returns error if reading terminal events fails.
    pub async fn update(&mut self) -> io::Result<()> {
        self.workbench.pump_events();

        if event::poll(Duration::from_millis(POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key).await,
                Event::Resize(_, _) => self.fitted.clear(),
                _ => {}
            }
        }

        Ok(())
    }

    /// Fits every pane whose content rect changed since its last fit.
    pub(crate) fn sync_fits(&mut self, areas: &[(PaneId, Rect)]) {
        let metrics = CellMetrics::from_settings(self.workbench.settings());
        self.fitted.retain(|pane, _| areas.iter().any(|(id, _)| id == pane));

        for (pane, rect) in areas {
            if self.fitted.get(pane) == Some(rect) {
                continue;
            }
            let container = ContainerSize::from_cells(rect.width, rect.height, metrics);
            if self.workbench.fit_pane(*pane, container) {
                self.fitted.insert(*pane, *rect);
            }
        }
    }

    /// Forgets every fit so the next render fits all panes again.
    pub(crate) fn invalidate_fits(&mut self) {
        self.fitted.clear();
    }
}
