use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

use crate::core::signal::Signal;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Remote-control signals (passed to the navigator)
    Signal(Signal),

    // TUI-local events (handled directly in TUI)
    Forward,
    ResetNavigation,
    ForceQuit, // Ctrl+C
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event, waiting up to `timeout`. `Duration::ZERO` returns
/// immediately.
pub fn poll_event_timeout(timeout: Duration) -> std::io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let event = match event::read()? {
        Event::Key(key_event) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            map_key(key_event)
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            _ => None,
        },
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(event)
}

/// Map a key press onto a remote-control signal or a TUI-local event.
///
/// Arrow keys and hjkl are the D-pad, Enter/Space is OK, Esc/Backspace is
/// Back. Releases are dropped so a key never fires twice.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Up | KeyCode::Char('k')) => Some(TuiEvent::Signal(Signal::Up)),
        (_, KeyCode::Down | KeyCode::Char('j')) => Some(TuiEvent::Signal(Signal::Down)),
        (_, KeyCode::Left | KeyCode::Char('h')) => Some(TuiEvent::Signal(Signal::Left)),
        (_, KeyCode::Right | KeyCode::Char('l')) => Some(TuiEvent::Signal(Signal::Right)),
        (_, KeyCode::Enter | KeyCode::Char(' ')) => Some(TuiEvent::Signal(Signal::Activate)),
        (_, KeyCode::Esc | KeyCode::Backspace) => Some(TuiEvent::Signal(Signal::Back)),
        (_, KeyCode::Char('f')) => Some(TuiEvent::Forward),
        (_, KeyCode::Char('r')) => Some(TuiEvent::ResetNavigation),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_dpad_keys() {
        assert_eq!(map_key(key(KeyCode::Up)), Some(TuiEvent::Signal(Signal::Up)));
        assert_eq!(map_key(key(KeyCode::Char('l'))), Some(TuiEvent::Signal(Signal::Right)));
        assert_eq!(map_key(key(KeyCode::Enter)), Some(TuiEvent::Signal(Signal::Activate)));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(TuiEvent::Signal(Signal::Back)));
        assert_eq!(map_key(key(KeyCode::Backspace)), Some(TuiEvent::Signal(Signal::Back)));
    }

    #[test]
    fn test_ctrl_c_is_force_quit() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ev), Some(TuiEvent::ForceQuit));
        // Plain 'c' is unbound
        assert_eq!(map_key(key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut ev = key(KeyCode::Left);
        ev.kind = KeyEventKind::Release;
        assert_eq!(map_key(ev), None);
    }

    #[test]
    fn test_local_keys() {
        assert_eq!(map_key(key(KeyCode::Char('f'))), Some(TuiEvent::Forward));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(TuiEvent::ResetNavigation));
    }
}
