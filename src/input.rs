use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    None,
}

pub fn map_key(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => Action::Quit,
        KeyCode::Char('r') if key.modifiers.is_empty() => Action::Refresh,
        _ => Action::None,
    }
}
