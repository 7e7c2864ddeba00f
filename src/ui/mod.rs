//! User interface module.
//!
//! Provides widgets and layout for the TUI.

pub mod layout;
pub mod pane;
pub mod tab_bar;

pub use layout::{ScreenAreas, pane_areas, screen_areas};
pub use pane::PaneWidget;
pub use tab_bar::TabBar;
