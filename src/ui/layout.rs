//! Screen layout: tab bar, pane area and status line, and the split of the
//! pane area by pane weights.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

use crate::layout::{Pane, SplitDirection};

/// Weight units per ratio denominator.
const RATIO_SCALE: f32 = 100.0;

/// Top-level screen areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Tab bar row.
    pub tabs: Rect,
    /// Area shared by the panes.
    pub panes: Rect,
    /// Status line row.
    pub status: Rect,
}

/// Splits the frame into tab bar, panes and status line.
#[must_use]
pub fn screen_areas(area: Rect) -> ScreenAreas {
    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    ScreenAreas {
        tabs: chunks[0],
        panes: chunks[1],
        status: chunks[2],
    }
}

/// Splits `area` among `panes` by weight, in render order.
///
/// `None` (or a single pane) gives the whole area to the first pane only.
#[must_use]
pub fn pane_areas(area: Rect, direction: SplitDirection, panes: &[&Pane]) -> Vec<Rect> {
    if panes.is_empty() {
        return Vec::new();
    }
    let direction = match direction {
        _ if panes.len() == 1 => return vec![area],
        SplitDirection::None => return vec![area],
        SplitDirection::Horizontal => Direction::Horizontal,
        SplitDirection::Vertical => Direction::Vertical,
    };

    let total: f32 = panes.iter().map(|p| p.size.max(0.0)).sum();
    let denominator = (total * RATIO_SCALE).round().max(1.0) as u32;
    let constraints: Vec<Constraint> = panes
        .iter()
        .map(|p| Constraint::Ratio((p.size.max(0.0) * RATIO_SCALE).round() as u32, denominator))
        .collect();

    RatatuiLayout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area)
        .to_vec()
}
