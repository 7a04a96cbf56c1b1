use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Navigation actions interpreted after the active panel declines a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select,
    Back,
    Refresh,
    Quit,
}

/// Ctrl-C quits regardless of what the active panel is doing.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Some(Action::Select),
        KeyCode::Esc
        | KeyCode::Backspace
        | KeyCode::BackTab
        | KeyCode::Left
        | KeyCode::Char('h') => Some(Action::Back),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('q') => Some(Action::Quit),
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
    fn maps_navigation_keys() {
        assert_eq!(action_for(&key(KeyCode::Enter)), Some(Action::Select));
        assert_eq!(action_for(&key(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(action_for(&key(KeyCode::Backspace)), Some(Action::Back));
        assert_eq!(action_for(&key(KeyCode::Char('h'))), Some(Action::Back));
        assert_eq!(action_for(&key(KeyCode::Char('r'))), Some(Action::Refresh));
        assert_eq!(action_for(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn interrupt_requires_control() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_interrupt(&ctrl_c));
        assert!(!is_interrupt(&key(KeyCode::Char('c'))));
        assert_eq!(action_for(&ctrl_c), None);
    }
}
