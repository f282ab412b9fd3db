use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Confirm,
    ConfirmWithDirectory,
    Cancel,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    ClearSearch,
    UpdateSearch(char),
    DeleteChar,
    Redraw,
    None,
}

/// Block until the next terminal event and convert it to an action
pub fn read_event() -> anyhow::Result<Action> {
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(key_to_action(key)),
        Event::Resize(..) => Ok(Action::Redraw),
        _ => Ok(Action::None),
    }
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Leave
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Cancel,
        (KeyCode::Char('g'), KeyModifiers::CONTROL) => Action::Cancel,
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Enter, _) => Action::Confirm,
        (KeyCode::Tab, _) => Action::ConfirmWithDirectory,

        // Navigation (Emacs style)
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Query input
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearSearch,
        (KeyCode::Char(c), modifiers) if is_typed_char(modifiers) => Action::UpdateSearch(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

/// Plain, shifted or AltGr (reported as Ctrl+Alt) characters
fn is_typed_char(modifiers: KeyModifiers) -> bool {
    let modifiers = modifiers.difference(KeyModifiers::SHIFT);
    modifiers.is_empty() || modifiers == KeyModifiers::CONTROL | KeyModifiers::ALT
}
