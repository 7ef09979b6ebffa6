use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Input, Screen};

/// Translates a key press into a session input for the given screen.
pub fn map_key(key: KeyEvent, screen: Screen) -> Option<Input> {
    // the modal only answers yes or no
    if screen == Screen::ConfirmDelete {
        return match key.code {
            KeyCode::Char('y') => Some(Input::Confirm),
            KeyCode::Char('n') | KeyCode::Esc => Some(Input::Cancel),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Input::Up,
        KeyCode::Down | KeyCode::Char('j') => Input::Down,
        KeyCode::PageUp => Input::PageUp,
        KeyCode::PageDown => Input::PageDown,
        KeyCode::Home => Input::Top,
        KeyCode::End => Input::Bottom,
        KeyCode::Enter if screen != Screen::View => Input::Open,
        KeyCode::Char('d') if screen != Screen::BucketSelection => Input::Delete,
        KeyCode::Char('r') if screen != Screen::View => Input::Refresh,
        KeyCode::Esc if screen != Screen::BucketSelection => Input::Back,
        KeyCode::Char('q') if screen == Screen::View => Input::Back,
        KeyCode::Char('q') => Input::Quit,
        _ => return None,
    };
    Some(input)
}
