//! TUI application state and event handling.
//!
//! `App` wraps a [`SearchSession`] with the bits of state only the terminal
//! needs: the table scroll offset and a dirty flag. Every key press is
//! translated to an [`Action`] and applied to the session synchronously
//! before the next event is read.

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::widgets::TableState;

use super::events::{Action, read_event};
use super::rendering::render_ui;
use crate::session::{SearchSession, Selection};

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: isize = 10;

pub struct App {
    session: SearchSession,
    table_state: TableState,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
}

impl App {
    pub fn new(session: SearchSession) -> Self {
        Self { session, table_state: TableState::default(), needs_redraw: true }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Run until the user confirms or cancels
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.session.state().is_finished() {
            if self.needs_redraw {
                terminal.draw(|f| render_ui(f, &self.session, &mut self.table_state))?;
                self.needs_redraw = false;
            }

            let action = read_event()?;
            self.handle_action(action);
        }

        Ok(())
    }

    pub fn into_selection(self) -> Option<Selection> {
        self.session.into_selection()
    }

    /// Apply a user action to the session (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Confirm => self.session.confirm(),
            Action::ConfirmWithDirectory => self.session.confirm_with_directory(),
            Action::Cancel => self.session.cancel(),
            Action::MoveUp => self.session.move_up(),
            Action::MoveDown => self.session.move_down(),
            Action::PageUp => self.session.move_by(-PAGE_SIZE),
            Action::PageDown => self.session.move_by(PAGE_SIZE),
            Action::ClearSearch => self.session.clear_query(),
            Action::UpdateSearch(c) => self.session.push_char(c),
            Action::DeleteChar => self.session.pop_char(),
            Action::Redraw => {}
            Action::None => return,
        }
        self.needs_redraw = true;
    }
}
