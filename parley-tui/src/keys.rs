//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Reset,
    Submit,
    ToggleDictation,
    CancelDictation,
    FocusNext,
    MoveUp,
    MoveDown,
    Confirm,
    Backspace,
    Type(char),
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') => Some(Action::Submit),
            KeyCode::Char('r') => Some(Action::Reset),
            KeyCode::Char('d') => Some(Action::ToggleDictation),
            KeyCode::Char('x') => Some(Action::CancelDictation),
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => Some(Action::Reset),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char(c) => Some(Action::Type(c)),
        _ => None,
    }
}
