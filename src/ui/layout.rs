//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by one account card, borders included.
pub const CARD_HEIGHT: u16 = 8;

/// Home screen layout, top to bottom.
pub struct AppLayout {
    pub navbar_area: Rect,
    pub carousel_area: Rect,
    pub actions_area: Rect,
    pub history_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),               // navbar
                Constraint::Length(CARD_HEIGHT + 2), // carousel with margins
                Constraint::Length(1),               // action chips
                Constraint::Min(3),                  // history (takes the rest)
                Constraint::Length(1),               // status bar
            ])
            .split(area);

        Self {
            navbar_area: chunks[0],
            carousel_area: chunks[1],
            actions_area: chunks[2],
            history_area: chunks[3],
            status_area: chunks[4],
        }
    }
}
