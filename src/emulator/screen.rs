//! Line-oriented screen buffer driven by `vte`.
//!
//! Keeps printable text and line structure only. Cursor addressing, colors
//! and modes are parsed and dropped.

use std::collections::VecDeque;

use unicode_width::UnicodeWidthChar;

use super::{CellMetrics, ContainerSize, TerminalEmulator};
use crate::settings::TerminalSettings;

/// Placeholder occupying the second cell of a wide character.
const WIDE_TAIL: char = '\0';

/// Tab stop interval.
const TAB_WIDTH: usize = 8;

/// Default grid before the first fit.
const DEFAULT_COLS: u16 = 80;
const DEFAULT_ROWS: u16 = 24;

struct Grid {
    lines: VecDeque<Vec<char>>,
    col: usize,
    cols: usize,
    rows: usize,
    scrollback: usize,
}

impl Grid {
    fn new(cols: u16, rows: u16, scrollback: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(Vec::new());
        Self {
            lines,
            col: 0,
            cols: usize::from(cols.max(1)),
            rows: usize::from(rows.max(1)),
            scrollback,
        }
    }

    fn current(&mut self) -> &mut Vec<char> {
        if self.lines.is_empty() {
            self.lines.push_back(Vec::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn put(&mut self, c: char) {
        let width = c.width().unwrap_or(0);
        if width == 0 {
            return;
        }
        if self.col + width > self.cols {
            self.line_feed();
            self.col = 0;
        }

        let col = self.col;
        let line = self.current();
        if line.len() < col {
            line.resize(col, ' ');
        }
        let cells = [c, WIDE_TAIL];
        for (offset, cell) in cells.iter().take(width).enumerate() {
            match line.get_mut(col + offset) {
                Some(slot) => *slot = *cell,
                None => line.push(*cell),
            }
        }
        self.col += width;
    }

    fn line_feed(&mut self) {
        self.lines.push_back(Vec::new());
        self.trim();
    }

    fn tab(&mut self) {
        let next = (self.col / TAB_WIDTH + 1) * TAB_WIDTH;
        self.col = next.min(self.cols.saturating_sub(1));
    }

    fn erase_line(&mut self, mode: u16) {
        let col = self.col;
        let line = self.current();
        match mode {
            0 => line.truncate(col),
            1 => {
                for cell in line.iter_mut().take(col + 1) {
                    *cell = ' ';
                }
            }
            _ => line.clear(),
        }
    }

    fn reset(&mut self) {
        self.lines.clear();
        self.lines.push_back(Vec::new());
        self.col = 0;
    }

    fn trim(&mut self) {
        let cap = self.rows + self.scrollback;
        while self.lines.len() > cap {
            self.lines.pop_front();
        }
    }
}

impl vte::Perform for Grid {
    fn print(&mut self, c: char) {
        self.put(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.col = self.col.saturating_sub(1),
            0x09 => self.tab(),
            0x0A..=0x0C => self.line_feed(),
            0x0D => self.col = 0,
            _ => {}
        }
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        _intermediates: &[u8],
        _ignore: bool,
        action: char,
    ) {
        let first = params
            .iter()
            .next()
            .and_then(|p| p.first().copied())
            .unwrap_or(0);
        let count = usize::from(first.max(1));

        match action {
            'K' => self.erase_line(first),
            'J' if first >= 2 => self.reset(),
            'C' => self.col = (self.col + count).min(self.cols.saturating_sub(1)),
            'D' => self.col = self.col.saturating_sub(count),
            'G' => self.col = (count - 1).min(self.cols.saturating_sub(1)),
            _ => {}
        }
    }
}

/// Scrollback-limited text buffer for one pane.
pub struct ScreenBuffer {
    parser: vte::Parser,
    grid: Grid,
    settings: TerminalSettings,
    metrics: CellMetrics,
}

impl ScreenBuffer {
    /// Returns the preferences currently applied.
    #[must_use]
    pub fn settings(&self) -> &TerminalSettings {
        &self.settings
    }
}

impl TerminalEmulator for ScreenBuffer {
    fn new(settings: &TerminalSettings) -> Self {
        Self {
            parser: vte::Parser::new(),
            grid: Grid::new(DEFAULT_COLS, DEFAULT_ROWS, settings.scrollback),
            settings: settings.clone(),
            metrics: CellMetrics::from_settings(settings),
        }
    }

    fn write(&mut self, data: &[u8]) {
        self.parser.advance(&mut self.grid, data);
    }

    fn propose_dimensions(&self, container: ContainerSize) -> Option<(u16, u16)> {
        self.metrics.grid_for(container)
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.grid.cols = usize::from(cols.max(1));
        self.grid.rows = usize::from(rows.max(1));
        self.grid.col = self.grid.col.min(self.grid.cols);
        self.grid.trim();
    }

    fn dimensions(&self) -> (u16, u16) {
        (
            u16::try_from(self.grid.cols).unwrap_or(u16::MAX),
            u16::try_from(self.grid.rows).unwrap_or(u16::MAX),
        )
    }

    fn apply_settings(&mut self, settings: &TerminalSettings) {
        self.settings = settings.clone();
        self.metrics = CellMetrics::from_settings(settings);
        self.grid.scrollback = settings.scrollback;
        self.grid.trim();
    }

    fn clear(&mut self) {
        self.parser = vte::Parser::new();
        self.grid.reset();
    }

    fn lines(&self) -> Vec<String> {
        self.grid
            .lines
            .iter()
            .map(|line| {
                let text: String = line.iter().filter(|c| **c != WIDE_TAIL).collect();
                text.trim_end().to_string()
            })
            .collect()
    }
}
