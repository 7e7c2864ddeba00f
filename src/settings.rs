//! Terminal preferences shared by every pane.

use crate::config::ShellType;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Default line height multiplier.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;

/// Default scrollback in lines.
pub const DEFAULT_SCROLLBACK: usize = 1000;

/// Cursor shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// Full cell block.
    #[default]
    Block,
    /// Line under the cell.
    Underline,
    /// Vertical bar.
    Bar,
}

impl CursorStyle {
    /// Parses a cursor style from a config string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "block" => Some(Self::Block),
            "underline" => Some(Self::Underline),
            "bar" | "beam" => Some(Self::Bar),
            _ => None,
        }
    }

    /// Returns the config file string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Underline => "underline",
            Self::Bar => "bar",
        }
    }
}

/// Preferences applied to every terminal adapter.
///
/// `shell` only affects sessions created after the change.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalSettings {
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub font_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Cursor shape.
    pub cursor_style: CursorStyle,
    /// Whether the cursor blinks.
    pub cursor_blink: bool,
    /// Lines kept above the visible screen.
    pub scrollback: usize,
    /// Shell for new sessions.
    pub shell: ShellType,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
            cursor_style: CursorStyle::Block,
            cursor_blink: true,
            scrollback: DEFAULT_SCROLLBACK,
            shell: ShellType::System,
        }
    }
}
