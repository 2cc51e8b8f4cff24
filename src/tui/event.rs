//! Event handling for the countdown screen.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::FlowError;

/// A user command from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pause or resume.
    TogglePause,
    /// Silence the alarm.
    Silence,
    /// Stop timing and rate the session.
    Finish,
    /// Stop timing early and rate the session as partial.
    SavePartial,
    /// Throw the session away.
    Discard,
}

/// Map a key press to an action.
#[must_use]
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Discard);
    }

    match key.code {
        KeyCode::Char(' ' | 'p') => Some(Action::TogglePause),
        KeyCode::Char('a') => Some(Action::Silence),
        KeyCode::Char('f') | KeyCode::Enter => Some(Action::Finish),
        KeyCode::Char('s') => Some(Action::SavePartial),
        KeyCode::Char('d' | 'q') | KeyCode::Esc => Some(Action::Discard),
        _ => None,
    }
}

/// Wait up to `timeout` for a key press.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_action(timeout: Duration) -> Result<Option<Action>, FlowError> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(action_for_key(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(press(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(action_for_key(press(KeyCode::Char('p'))), Some(Action::TogglePause));
        assert_eq!(action_for_key(press(KeyCode::Char('a'))), Some(Action::Silence));
        assert_eq!(action_for_key(press(KeyCode::Enter)), Some(Action::Finish));
        assert_eq!(action_for_key(press(KeyCode::Char('s'))), Some(Action::SavePartial));
        assert_eq!(action_for_key(press(KeyCode::Esc)), Some(Action::Discard));
        assert_eq!(action_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_discards() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(key), Some(Action::Discard));
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Char('f'));
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(key), None);
    }
}
