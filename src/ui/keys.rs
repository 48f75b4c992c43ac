//! Keyboard handling.
//!
//! Shortcuts answer only to key presses, never to repeats or releases.
//! While the filter input is active every keystroke belongs to the input;
//! the pause and stop shortcuts cannot fire from inside it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::DashState;
use crate::types::SortKey;

/// What a key press asks the event loop to do. Everything else a key does
/// happens directly on the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    TogglePause,
    Stop,
    Quit,
}

pub fn handle_key(state: &mut DashState, key: KeyEvent) -> Option<UserAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C quits from any mode, including the filter input.
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(UserAction::Quit);
    }

    if state.filter.active {
        match key.code {
            KeyCode::Esc => state.filter.cancel(),
            KeyCode::Enter => state.filter.commit(),
            KeyCode::Backspace => {
                state.filter.buffer.pop();
            }
            KeyCode::Char(c) => state.filter.buffer.push(c),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char(' ') => Some(UserAction::TogglePause),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(UserAction::Stop),
        KeyCode::Char('n') | KeyCode::Char('N') => {
            state.remaining.sort_by(SortKey::Name);
            None
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => {
            state.remaining.sort_by(SortKey::Size);
            None
        }
        KeyCode::Char('/') => {
            state.filter.open();
            None
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(UserAction::Quit),
        _ => None,
    }
}
