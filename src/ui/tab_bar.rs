//! Tab bar widget.
//!
//! One numbered tab per session of the active project.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::session::{SessionStatus, TabInfo};

/// Marker shown after the name of a busy tab.
const BUSY_MARKER: &str = " ●";

/// Tab bar widget.
pub struct TabBar<'a> {
    tabs: &'a [TabInfo],
}

impl<'a> TabBar<'a> {
    /// Creates a tab bar.
    #[must_use]
    pub fn new(tabs: &'a [TabInfo]) -> Self {
        Self { tabs }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bg_color = Color::Black;
        buf.set_style(area, Style::default().fg(Color::White).bg(bg_color));

        let mut spans = Vec::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    "│",
                    Style::default().fg(Color::DarkGray).bg(bg_color),
                ));
            }

            let style = if tab.is_active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray).bg(bg_color)
            };
            spans.push(Span::styled(format!(" {} {} ", tab.index + 1, tab.name), style));

            if tab.status == SessionStatus::Busy {
                spans.push(Span::styled(
                    BUSY_MARKER,
                    Style::default().fg(Color::Yellow).bg(bg_color),
                ));
            }
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
