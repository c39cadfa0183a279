use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use smoothscroll_core::input::{Key, Modifiers, WHEEL_NOTCH};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    /// Move keyboard focus between the article and the side pane
    ToggleFocus,
    /// Forward a key to the scroll engine
    Key(Key, Modifiers),
    /// Forward a wheel notch at a terminal cell (column, row, dx, dy)
    Wheel {
        column: u16,
        row: u16,
        delta_x: f64,
        delta_y: f64,
    },
    /// Focus whatever sits under a terminal cell
    Click { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Tab, KeyModifiers::NONE) => Action::ToggleFocus,
        (code, modifiers) => match scroll_key(code) {
            Some(key) => Action::Key(key, convert_modifiers(modifiers)),
            None => Action::None,
        },
    }
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    let (delta_x, delta_y) = match mouse.kind {
        MouseEventKind::ScrollDown => (0.0, WHEEL_NOTCH),
        MouseEventKind::ScrollUp => (0.0, -WHEEL_NOTCH),
        MouseEventKind::ScrollRight => (WHEEL_NOTCH, 0.0),
        MouseEventKind::ScrollLeft => (-WHEEL_NOTCH, 0.0),
        MouseEventKind::Down(MouseButton::Left) => {
            return Action::Click {
                column: mouse.column,
                row: mouse.row,
            }
        }
        _ => return Action::None,
    };
    // shift+wheel scrolls sideways, as browsers do
    let (delta_x, delta_y) = if mouse.modifiers.contains(KeyModifiers::SHIFT) {
        (delta_y, delta_x)
    } else {
        (delta_x, delta_y)
    };
    Action::Wheel {
        column: mouse.column,
        row: mouse.row,
        delta_x,
        delta_y,
    }
}

fn scroll_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Other(13),
        KeyCode::Char(c) => Key::Other(c as u32),
        _ => return None,
    };
    Some(key)
}

fn convert_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column: 12,
            row: 4,
            modifiers,
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
    }

    #[test]
    fn test_scroll_keys_keep_modifiers() {
        assert_eq!(
            handle_key_event(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Action::Key(Key::PageDown, Modifiers::NONE)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' '), KeyModifiers::SHIFT)),
            Action::Key(Key::Space, Modifiers::SHIFT)
        );
        match handle_key_event(key(KeyCode::Down, KeyModifiers::ALT)) {
            Action::Key(Key::Down, modifiers) => assert!(modifiers.alt),
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(handle_key_event(key(KeyCode::F(5), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_wheel_notches() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, KeyModifiers::NONE)),
            Action::Wheel {
                column: 12,
                row: 4,
                delta_x: 0.0,
                delta_y: -120.0
            }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, KeyModifiers::SHIFT)),
            Action::Wheel {
                column: 12,
                row: 4,
                delta_x: 120.0,
                delta_y: 0.0
            }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, KeyModifiers::NONE)),
            Action::None
        );
    }

    #[test]
    fn test_click_focuses() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE)),
            Action::Click { column: 12, row: 4 }
        );
    }
}
