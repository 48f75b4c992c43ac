#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use uuid::Uuid;

    use crate::metrics::Metrics;
    use crate::state::DashState;
    use crate::types::SortKey;
    use crate::ui::keys::{handle_key, UserAction};

    fn new_state() -> DashState {
        DashState::new(Uuid::new_v4(), Metrics::new(), Duration::from_millis(3500))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press_char(c: char) -> KeyEvent {
        press(KeyCode::Char(c))
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char(' ')), Some(UserAction::TogglePause));
    }

    #[test]
    fn test_s_stops_in_both_cases() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char('s')), Some(UserAction::Stop));
        assert_eq!(handle_key(&mut state, press_char('S')), Some(UserAction::Stop));
    }

    #[test]
    fn test_sort_keys_reorder_in_place() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char('z')), None);
        assert_eq!(state.remaining.sort(), SortKey::Size);
        assert_eq!(handle_key(&mut state, press_char('n')), None);
        assert_eq!(state.remaining.sort(), SortKey::Name);
        assert_eq!(handle_key(&mut state, press_char('Z')), None);
        assert_eq!(state.remaining.sort(), SortKey::Size);
    }

    #[test]
    fn test_quit_keys() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char('q')), Some(UserAction::Quit));
        assert_eq!(handle_key(&mut state, press(KeyCode::Esc)), Some(UserAction::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut state, ctrl_c), Some(UserAction::Quit));
    }

    #[test]
    fn test_releases_and_repeats_are_ignored() {
        let mut state = new_state();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(handle_key(&mut state, release), None);
        let repeat =
            KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(handle_key(&mut state, repeat), None);
    }

    #[test]
    fn test_slash_opens_filter_input() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char('/')), None);
        assert!(state.filter.active);
    }

    #[test]
    fn test_active_filter_swallows_shortcuts() {
        let mut state = new_state();
        handle_key(&mut state, press_char('/'));

        // The pause and stop shortcuts must not fire while typing.
        assert_eq!(handle_key(&mut state, press_char(' ')), None);
        assert_eq!(handle_key(&mut state, press_char('s')), None);
        assert_eq!(handle_key(&mut state, press_char('q')), None);
        assert_eq!(state.filter.buffer, " sq");
    }

    #[test]
    fn test_filter_commit_applies_needle() {
        let mut state = new_state();
        handle_key(&mut state, press_char('/'));
        handle_key(&mut state, press_char('V'));
        handle_key(&mut state, press_char('a'));
        handle_key(&mut state, press_char('c'));
        assert_eq!(handle_key(&mut state, press(KeyCode::Enter)), None);
        assert!(!state.filter.active);
        assert_eq!(state.filter.applied(), Some("vac"));
    }

    #[test]
    fn test_filter_backspace_edits_buffer() {
        let mut state = new_state();
        handle_key(&mut state, press_char('/'));
        handle_key(&mut state, press_char('a'));
        handle_key(&mut state, press_char('b'));
        handle_key(&mut state, press(KeyCode::Backspace));
        assert_eq!(state.filter.buffer, "a");
    }

    #[test]
    fn test_filter_escape_cancels_without_applying() {
        let mut state = new_state();
        handle_key(&mut state, press_char('/'));
        handle_key(&mut state, press_char('x'));
        assert_eq!(handle_key(&mut state, press(KeyCode::Esc)), None);
        assert!(!state.filter.active);
        assert_eq!(state.filter.applied(), None);
    }

    #[test]
    fn test_ctrl_c_quits_even_inside_filter() {
        let mut state = new_state();
        handle_key(&mut state, press_char('/'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut state, ctrl_c), Some(UserAction::Quit));
    }

    #[test]
    fn test_unmapped_keys_do_nothing() {
        let mut state = new_state();
        assert_eq!(handle_key(&mut state, press_char('x')), None);
        assert_eq!(handle_key(&mut state, press(KeyCode::Tab)), None);
        assert!(!state.filter.active);
    }
}
