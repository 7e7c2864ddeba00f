//! Rendering methods for the App.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::bridge::PtyBridge;
use crate::emulator::TerminalEmulator;
use crate::layout::{Pane, PaneId};
use crate::ui::{PaneWidget, TabBar, pane_areas, screen_areas};

use super::App;

/// Key hint shown when there is no status message.
const HINT: &str = "Ctrl+T new  Alt+H/V split  Alt+X close pane  Ctrl+Q quit";

impl<B: PtyBridge> App<B> {
    /// Renders the application and fits panes whose area changed.
    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let areas = screen_areas(area);
        let tabs = self.workbench.tab_info();
        frame.render_widget(TabBar::new(&tabs), areas.tabs);

        let fits = self.render_panes(frame, areas.panes);
        self.render_status(frame, areas.status);
        self.sync_fits(&fits);
    }

    /// Draws the visible panes. Returns each pane's content rect.
    fn render_panes(&self, frame: &mut ratatui::Frame, area: Rect) -> Vec<(PaneId, Rect)> {
        let Some(layout) = self.workbench.layout() else {
            return Vec::new();
        };
        let views = self.workbench.visible_panes();
        let panes: Vec<&Pane> = views.iter().map(|v| v.pane).collect();
        let rects = pane_areas(area, layout.direction(), &panes);
        let bordered = !layout.is_single();

        let mut fits = Vec::with_capacity(views.len());
        for (view, rect) in views.iter().zip(rects) {
            let lines = self
                .workbench
                .adapter(view.pane.id)
                .map(|adapter| adapter.emulator().lock().visible_lines())
                .unwrap_or_default();
            let title = view.session.map(|s| s.name.as_str()).unwrap_or_default();

            let widget = PaneWidget::new(&lines)
                .title(title)
                .bordered(bordered)
                .focused(view.focused);
            frame.render_widget(widget, rect);
            fits.push((view.pane.id, PaneWidget::content_area(rect, bordered)));
        }
        fits
    }

    fn render_status(&self, frame: &mut ratatui::Frame, area: Rect) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        let text = if self.status.is_empty() {
            format!(" {}  |  {}", self.workbench.project().display(), HINT)
        } else {
            format!(" {}", self.status)
        };
        let line = Line::from(Span::styled(text, style));
        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
