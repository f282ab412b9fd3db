// TUI module for the interactive history selector
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
use app::App;
use terminal::TerminalManager;

use crate::session::{SearchSession, Selection};

/// Run the interactive selector until the user confirms or cancels
pub fn run_interactive(session: SearchSession) -> Result<Option<Selection>> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(session);

    let res = app.run(manager.terminal_mut());
    first_error(res, manager.restore())?;

    Ok(app.into_selection())
}

/// The app's own error wins over a failure to restore the terminal
fn first_error(res: Result<()>, restored: Result<()>) -> Result<()> {
    res?;
    restored
}
