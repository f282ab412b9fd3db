use ratatui::Frame;
use ratatui::layout::{Constraint, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use super::layout::AppLayout;
use super::timestamps::format_timestamp;
use crate::models::HistoryEntry;
use crate::session::SearchSession;
use crate::utils::terminal::display_line;
use crate::utils::{format_path_with_tilde, shorten_path};

pub const HELP_TEXT: &str = "TAB: cd & cmd    ENTER: cmd    ESC: exit";
pub const INPUT_LABEL: &str = "Search: ";

/// Directory column width, in characters
const DIRECTORY_WIDTH: u16 = 20;
const DATE_WIDTH: u16 = 12;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const STATUS_BG: Color = Color::Rgb(24, 24, 27);

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, session: &SearchSession, table_state: &mut TableState) {
    let layout = AppLayout::new(frame.area());

    render_help(frame, layout.help_area);
    render_table(frame, layout.table_area, session, table_state);
    render_status_bar(frame, layout.status_area, session);
    render_input(frame, layout.input_area, session.query());
}

fn render_help(frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new(HELP_TEXT).style(Style::default().fg(MUTED)), area);
}

fn history_row<'a>(entry: &HistoryEntry, current_directory: &str) -> Row<'a> {
    let directory_style = if entry.directory == current_directory {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };

    Row::new(vec![
        Cell::from(format_timestamp(&entry.timestamp)).style(Style::default().fg(MUTED)),
        Cell::from(shorten_path(&entry.directory, DIRECTORY_WIDTH as usize)).style(directory_style),
        Cell::from(display_line(&entry.command)),
    ])
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    session: &SearchSession,
    table_state: &mut TableState,
) {
    let current_directory = session.current_directory();
    let rows: Vec<Row> = session.view().map(|entry| history_row(entry, current_directory)).collect();

    let header = Row::new(vec!["Date", "Directory", "Command"])
        .style(Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(DATE_WIDTH),
            Constraint::Length(DIRECTORY_WIDTH),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    table_state.select(session.selected_index());
    frame.render_stateful_widget(table, area, table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, session: &SearchSession) {
    let status_text = if session.total() == 0 {
        " No history recorded yet ".to_string()
    } else if session.is_empty() {
        format!(" No matches (0/{}) ", session.total())
    } else {
        format!(
            " {}/{} | {}",
            session.len(),
            session.total(),
            format_path_with_tilde(session.current_directory())
        )
    };

    let paragraph =
        Paragraph::new(status_text).style(Style::default().fg(BRIGHT).bg(STATUS_BG));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, query: &str) {
    let line = Line::from(vec![
        Span::styled(INPUT_LABEL, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw(query),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let offset = (INPUT_LABEL.chars().count() + query.chars().count()) as u16;
    let x = area.x.saturating_add(offset).min(area.right().saturating_sub(1));
    frame.set_cursor_position(Position::new(x, area.y));
}
