use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Stacked selector layout
pub struct AppLayout {
    pub help_area: Rect,
    pub table_area: Rect,
    pub status_area: Rect,
    pub input_area: Rect,
}

impl AppLayout {
    /// Create stacked layout:
    /// - Key help: top row
    /// - History table: remaining rows
    /// - Match counts: one row
    /// - Query input: bottom row
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            help_area: chunks[0],
            table_area: chunks[1],
            status_area: chunks[2],
            input_area: chunks[3],
        }
    }
}
