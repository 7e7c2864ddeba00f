//! Termdeck
//!
//! A terminal workbench: many concurrent shell sessions, shown as tabs and in
//! splittable panes, grouped by project.
//!
//! # Architecture
//!
//! - **Bridge Module**: PTY backend behind the [`bridge::PtyBridge`] trait
//! - **Session Module**: per-project tab registry
//! - **Layout Module**: flat weighted pane split
//! - **Workbench Module**: keeps registry, layouts, focus and adapters consistent
//! - **Adapter Module**: binds one pane's emulator to one session
//! - **UI Module**: Ratatui widgets and pane layout
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use termdeck::bridge::NativePtyBridge;
//! use termdeck::settings::TerminalSettings;
//! use termdeck::workbench::Workbench;
//!
//! # async fn run() -> Result<(), termdeck::workbench::WorkbenchError> {
//! let bridge = Arc::new(NativePtyBridge::new());
//! let workbench: Workbench<NativePtyBridge> =
//!     Workbench::open(bridge, "/tmp/project", TerminalSettings::default()).await?;
//! // Run event loop...
//! # Ok(())
//! # }
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::unnested_or_patterns)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod adapter;
pub mod app;
pub mod bridge;
pub mod config;
pub mod emulator;
pub mod focus;
pub mod layout;
pub mod logging;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod ui;
pub mod workbench;

// Re-export main types
pub use adapter::TerminalAdapter;
pub use app::App;
pub use bridge::{MockPtyBridge, NativePtyBridge, PtyBridge};
pub use config::Config;
pub use layout::{Layout, Pane, PaneId, SplitDirection};
pub use session::{Session, SessionId, SessionRegistry, SessionStatus};
pub use settings::TerminalSettings;
pub use snapshot::WorkspaceSnapshot;
pub use workbench::{Workbench, WorkbenchError};
