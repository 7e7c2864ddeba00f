//! Terminal emulator seam.
//!
//! The adapter drives an emulator through [`TerminalEmulator`]; the bundled
//! implementation is [`ScreenBuffer`].

mod screen;

pub use screen::ScreenBuffer;

use crate::settings::TerminalSettings;

/// Width of a cell as a fraction of the font size.
const CELL_WIDTH_RATIO: f32 = 0.6;

/// Pixel size of a pane's content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl ContainerSize {
    /// Creates a container size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel size of a `cols` x `rows` character area.
    ///
    /// Half a cell of slack is added so proposing dimensions for the result
    /// gives back exactly `cols` x `rows`.
    #[must_use]
    pub fn from_cells(cols: u16, rows: u16, metrics: CellMetrics) -> Self {
        if cols == 0 || rows == 0 {
            return Self::new(0.0, 0.0);
        }
        Self {
            width: (f32::from(cols) + 0.5) * metrics.width,
            height: (f32::from(rows) + 0.5) * metrics.height,
        }
    }

    /// Returns true if either side is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Pixel size of one character cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Cell width in pixels.
    pub width: f32,
    /// Cell height in pixels.
    pub height: f32,
}

impl CellMetrics {
    /// Derives the cell size from font size and line height.
    #[must_use]
    pub fn from_settings(settings: &TerminalSettings) -> Self {
        Self {
            width: settings.font_size * CELL_WIDTH_RATIO,
            height: settings.font_size * settings.line_height,
        }
    }

    /// Character grid that fits in `container`, or None if not even one cell
    /// fits.
    #[must_use]
    pub fn grid_for(&self, container: ContainerSize) -> Option<(u16, u16)> {
        if container.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let cols = (container.width / self.width).floor();
        let rows = (container.height / self.height).floor();
        if cols < 1.0 || rows < 1.0 {
            return None;
        }
        Some((
            cols.min(f32::from(u16::MAX)) as u16,
            rows.min(f32::from(u16::MAX)) as u16,
        ))
    }
}

/// Terminal emulator driven by a pane adapter.
///
/// An emulator is created once per pane and mutated in place for its whole
/// life; settings changes never recreate it.
pub trait TerminalEmulator: Send + 'static {
    /// Creates an emulator with the given preferences.
    fn new(settings: &TerminalSettings) -> Self
    where
        Self: Sized;

    /// Feeds output bytes from the session.
    fn write(&mut self, data: &[u8]);

    /// Character grid that would fill `container`, or None if it cannot be
    /// measured (hidden or zero-size).
    fn propose_dimensions(&self, container: ContainerSize) -> Option<(u16, u16)>;

    /// Resizes the character grid.
    fn resize(&mut self, cols: u16, rows: u16);

    /// Returns `(cols, rows)`.
    fn dimensions(&self) -> (u16, u16);

    /// Applies new preferences in place, keeping content.
    fn apply_settings(&mut self, settings: &TerminalSettings);

    /// Discards all content.
    fn clear(&mut self);

    /// Returns every retained line, oldest first.
    fn lines(&self) -> Vec<String>;

    /// Returns the last `rows` lines.
    fn visible_lines(&self) -> Vec<String> {
        let lines = self.lines();
        let rows = usize::from(self.dimensions().1);
        let skip = lines.len().saturating_sub(rows);
        lines.into_iter().skip(skip).collect()
    }
}
