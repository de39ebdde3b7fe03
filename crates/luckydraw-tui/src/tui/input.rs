// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tile cursor, history
// scroll, settings focus, dialogs).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown in the history log.
const PAGE_SIZE: usize = 10;

/// Longest text accepted in a settings field.
const MAX_INPUT_LEN: usize = 12;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally by mutating
/// `ViewState` or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_reset {
        return handle_confirm_reset(key_event, view_state);
    }
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }
    if view_state.settings.editing {
        return handle_editing(key_event, view_state);
    }
    if view_state.settings.open {
        return handle_settings(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        KeyCode::Char('d') | KeyCode::Char(' ') => Some(UserCommand::Draw),

        // Tile cursor
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.selected_tile = view_state.selected_tile.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let last = view_state.snapshot.current.len().saturating_sub(1);
            view_state.selected_tile = (view_state.selected_tile + 1).min(last);
            None
        }

        KeyCode::Char('x') => view_state.selected_number().map(UserCommand::MarkAbsent),
        KeyCode::Char('r') => Some(UserCommand::RedrawAbsent),
        KeyCode::Char('c') => Some(UserCommand::ConfirmRound),

        // Reset and quit: confirm first
        KeyCode::Char('R') => {
            view_state.confirm_reset = true;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        KeyCode::Char('s') => {
            view_state.settings.open = true;
            None
        }

        // History scrolling
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_history(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_history(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_history(view_state, -(PAGE_SIZE as isize));
            None
        }
        KeyCode::PageDown => {
            scroll_history(view_state, PAGE_SIZE as isize);
            None
        }
        KeyCode::Home => {
            view_state.history_scroll = 0;
            None
        }

        _ => None,
    }
}

/// Handle key events while the reset confirmation dialog is showing.
///
/// `y` confirms (sends ResetAll), `n` or `Esc` cancels, everything else is
/// blocked.
fn handle_confirm_reset(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_reset = false;
            view_state.history_scroll = 0;
            Some(UserCommand::ResetAll)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_reset = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while the quit confirmation dialog is showing.
///
/// `y` or `q` confirms, `n` or `Esc` cancels, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while the settings panel has focus.
fn handle_settings(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let settings = &mut view_state.settings;
    match key_event.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
            settings.field = settings.field.next();
        }
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
            settings.field = settings.field.prev();
        }
        KeyCode::Enter => {
            settings.editing = true;
            settings.buffer = view_state.snapshot.config.get(settings.field).to_string();
        }
        KeyCode::Esc | KeyCode::Char('s') => {
            settings.open = false;
        }
        _ => {}
    }
    None
}

/// Handle key events while a settings field is being edited.
///
/// - Printable characters are appended to the buffer
/// - Backspace removes the last character
/// - Enter commits; Tab commits and moves to the next field
/// - Esc discards the edit
fn handle_editing(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let settings = &mut view_state.settings;
    match key_event.code {
        KeyCode::Enter => {
            settings.editing = false;
            Some(UserCommand::EditField {
                field: settings.field,
                input: std::mem::take(&mut settings.buffer),
            })
        }
        KeyCode::Tab => {
            let field = settings.field;
            settings.editing = false;
            settings.field = field.next();
            Some(UserCommand::EditField {
                field,
                input: std::mem::take(&mut settings.buffer),
            })
        }
        KeyCode::Esc => {
            settings.editing = false;
            settings.buffer.clear();
            None
        }
        KeyCode::Backspace => {
            settings.buffer.pop();
            None
        }
        KeyCode::Char(c) if !c.is_control() && settings.buffer.len() < MAX_INPUT_LEN => {
            settings.buffer.push(c);
            None
        }
        _ => None,
    }
}

/// Move the history scroll offset, keeping at least one entry in view.
fn scroll_history(view_state: &mut ViewState, delta: isize) {
    let max = view_state.snapshot.history.len().saturating_sub(1);
    let offset = view_state.history_scroll.saturating_add_signed(delta);
    view_state.history_scroll = offset.min(max);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{AppSnapshot, HistoryEntry};
    use crossterm::event::KeyEventState;
    use luckydraw_core::config::ConfigField;
    use luckydraw_core::Phase;

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Helper to create a KeyEvent with Ctrl modifier.
    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn reviewing_state(current: Vec<i64>) -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            phase: Phase::Reviewing,
            current,
            ..AppSnapshot::default()
        });
        state
    }

    fn state_with_history(rounds: u32) -> ViewState {
        let mut state = ViewState::default();
        state.snapshot.history = (1..=rounds)
            .map(|index| HistoryEntry {
                index,
                numbers: vec![i64::from(index)],
                absent_numbers: vec![],
                timestamp: String::new(),
            })
            .collect();
        state
    }

    // -- Draw cycle --

    #[test]
    fn d_and_space_draw() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('d')), &mut state), Some(UserCommand::Draw));
        assert_eq!(handle_key(key(KeyCode::Char(' ')), &mut state), Some(UserCommand::Draw));
    }

    #[test]
    fn r_redraws_and_c_confirms() {
        let mut state = reviewing_state(vec![1, 2]);
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::RedrawAbsent)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::ConfirmRound)
        );
    }

    // -- Tile cursor --

    #[test]
    fn arrows_move_cursor_within_bounds() {
        let mut state = reviewing_state(vec![4, 8, 15]);

        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(state.selected_tile, 0, "Left at 0 should stay at 0");

        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Char('l')), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(state.selected_tile, 2, "Right should stop at the last tile");

        handle_key(key(KeyCode::Char('h')), &mut state);
        assert_eq!(state.selected_tile, 1);
    }

    #[test]
    fn x_marks_selected_tile_absent() {
        let mut state = reviewing_state(vec![4, 8, 15]);
        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut state),
            Some(UserCommand::MarkAbsent(8))
        );
    }

    #[test]
    fn x_without_tiles_does_nothing() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
    }

    // -- Reset confirmation --

    #[test]
    fn shift_r_opens_reset_dialog_without_command() {
        let mut state = ViewState::default();
        let result = handle_key(key(KeyCode::Char('R')), &mut state);
        assert!(result.is_none());
        assert!(state.confirm_reset);
    }

    #[test]
    fn reset_dialog_y_sends_reset_all() {
        let mut state = state_with_history(5);
        state.history_scroll = 3;
        state.confirm_reset = true;
        let result = handle_key(key(KeyCode::Char('y')), &mut state);
        assert_eq!(result, Some(UserCommand::ResetAll));
        assert!(!state.confirm_reset);
        assert_eq!(state.history_scroll, 0);
    }

    #[test]
    fn reset_dialog_n_and_esc_cancel() {
        for code in [KeyCode::Char('n'), KeyCode::Esc] {
            let mut state = ViewState::default();
            state.confirm_reset = true;
            assert!(handle_key(key(code), &mut state).is_none());
            assert!(!state.confirm_reset);
        }
    }

    #[test]
    fn reset_dialog_blocks_other_keys() {
        let mut state = reviewing_state(vec![1, 2, 3]);
        state.confirm_reset = true;
        assert!(handle_key(key(KeyCode::Char('d')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('c')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Right), &mut state).is_none());
        assert_eq!(state.selected_tile, 0);
        assert!(state.confirm_reset);
    }

    // -- Quit confirmation --

    #[test]
    fn double_q_workflow_quits() {
        let mut state = ViewState::default();

        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none(), "First q should not send Quit");
        assert!(state.confirm_quit);

        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(result, Some(UserCommand::Quit));
    }

    #[test]
    fn confirm_quit_esc_cancels() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));

        state.settings.open = true;
        state.settings.editing = true;
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));
        assert!(state.settings.buffer.is_empty(), "Ctrl+C must not type a 'c'");
    }

    // -- Settings --

    #[test]
    fn settings_navigation_wraps() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('s')), &mut state);
        assert!(state.settings.open);

        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.settings.field, ConfigField::Max);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.settings.field, ConfigField::DrawCount);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.settings.field, ConfigField::Min);
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.settings.field, ConfigField::DrawCount);

        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.settings.open);
    }

    #[test]
    fn settings_block_draw_keys() {
        let mut state = ViewState::default();
        state.settings.open = true;
        assert!(handle_key(key(KeyCode::Char('d')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn edit_field_commits_typed_text() {
        let mut state = ViewState::default();
        state.settings.open = true;
        state.settings.field = ConfigField::Max;

        handle_key(key(KeyCode::Enter), &mut state);
        assert!(state.settings.editing);
        assert_eq!(state.settings.buffer, "1000", "Buffer starts with the current value");

        for _ in 0..4 {
            handle_key(key(KeyCode::Backspace), &mut state);
        }
        handle_key(key(KeyCode::Char('5')), &mut state);
        handle_key(key(KeyCode::Char('0')), &mut state);

        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            result,
            Some(UserCommand::EditField {
                field: ConfigField::Max,
                input: "50".into()
            })
        );
        assert!(!state.settings.editing);
        assert!(state.settings.open);
        assert!(state.settings.buffer.is_empty());
    }

    #[test]
    fn edit_field_tab_commits_and_advances() {
        let mut state = ViewState::default();
        state.settings.open = true;
        state.settings.editing = true;
        state.settings.buffer = "3".into();

        let result = handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(
            result,
            Some(UserCommand::EditField {
                field: ConfigField::Min,
                input: "3".into()
            })
        );
        assert_eq!(state.settings.field, ConfigField::Max);
        assert!(!state.settings.editing);
    }

    #[test]
    fn edit_field_esc_discards() {
        let mut state = ViewState::default();
        state.settings.open = true;
        state.settings.editing = true;
        state.settings.buffer = "99".into();

        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(!state.settings.editing);
        assert!(state.settings.buffer.is_empty());
        assert!(state.settings.open, "Esc while editing only leaves the field");
    }

    #[test]
    fn edit_field_passes_letters_through() {
        let mut state = ViewState::default();
        state.settings.open = true;
        state.settings.editing = true;
        handle_key(key(KeyCode::Char('q')), &mut state);
        handle_key(key(KeyCode::Char('x')), &mut state);
        assert_eq!(state.settings.buffer, "qx");
        assert!(!state.confirm_quit);
    }

    #[test]
    fn edit_field_caps_length() {
        let mut state = ViewState::default();
        state.settings.open = true;
        state.settings.editing = true;
        for _ in 0..20 {
            handle_key(key(KeyCode::Char('9')), &mut state);
        }
        assert_eq!(state.settings.buffer.len(), MAX_INPUT_LEN);
    }

    // -- History scrolling --

    #[test]
    fn history_scroll_is_clamped() {
        let mut state = state_with_history(3);

        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.history_scroll, 0);

        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.history_scroll, 2);

        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.history_scroll, 0);

        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.history_scroll, 2);

        handle_key(key(KeyCode::Home), &mut state);
        assert_eq!(state.history_scroll, 0);
    }

    // -- KeyEventKind filtering --

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let release_event = KeyEvent {
            code: KeyCode::Char('d'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(handle_key(release_event, &mut state).is_none());
    }

    #[test]
    fn unknown_key_returns_none() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('z')), &mut state).is_none());
    }
}
