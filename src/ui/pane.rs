//! Terminal pane widget.
//!
//! Renders the tail of a pane's emulator lines. Split panes get a border
//! titled with the session name; the focused one is highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// Terminal pane widget.
pub struct PaneWidget<'a> {
    lines: &'a [String],
    title: Option<&'a str>,
    bordered: bool,
    focused: bool,
}

impl<'a> PaneWidget<'a> {
    /// Creates a pane widget over emulator lines, oldest first.
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            title: None,
            bordered: false,
            focused: false,
        }
    }

    /// Sets the title shown in the border.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Draws a border around the content.
    #[must_use]
    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    /// Sets the focused state.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Content area inside `area` for the given border setting.
    #[must_use]
    pub fn content_area(area: Rect, bordered: bool) -> Rect {
        if bordered {
            Block::default().borders(Borders::ALL).inner(area)
        } else {
            area
        }
    }
}

impl Widget for PaneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let inner = Self::content_area(area, self.bordered);
        if self.bordered {
            let border_style = if self.focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style);
            if let Some(title) = self.title {
                block = block.title(format!(" {title} "));
            }
            block.render(area, buf);
        }

        let rows = usize::from(inner.height);
        let skip = self.lines.len().saturating_sub(rows);
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            let y = inner.y + row as u16;
            buf.set_stringn(inner.x, y, line, usize::from(inner.width), Style::default());
        }
    }
}
