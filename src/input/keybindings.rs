use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Form
    Submit,
    Copy,
    Clear,

    // Editor cursor
    Left,
    Right,
    Home,
    End,

    // Drafted email panel
    ScrollUp,
    ScrollDown,

    ToggleTheme,
    Quit,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

/// A displayable keybinding entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: &'static str,
}

/// Actions shown in the help bar, in display order
const HINT_ACTIONS: [Action; 6] = [
    Action::Submit,
    Action::Copy,
    Action::Clear,
    Action::ToggleTheme,
    Action::ScrollDown,
    Action::Quit,
];

impl KeyBindings {
    pub fn new() -> Self {
        let mut map = HashMap::new();

        map.insert(ctrl_key('s'), Action::Submit);
        map.insert(ctrl_key('y'), Action::Copy);
        map.insert(ctrl_key('l'), Action::Clear);
        map.insert(ctrl_key('t'), Action::ToggleTheme);

        map.insert(key_code(KeyCode::Left), Action::Left);
        map.insert(key_code(KeyCode::Right), Action::Right);
        map.insert(key_code(KeyCode::Home), Action::Home);
        map.insert(key_code(KeyCode::End), Action::End);

        map.insert(key_code(KeyCode::PageUp), Action::ScrollUp);
        map.insert(key_code(KeyCode::PageDown), Action::ScrollDown);

        map.insert(key_code(KeyCode::Esc), Action::Quit);
        map.insert(ctrl_key('c'), Action::Quit);

        Self { bindings: map }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        // Terminals report Ctrl+S as either 's' or 'S' depending on shift state
        let normalized = match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyEvent::new(KeyCode::Char(c.to_ascii_lowercase()), KeyModifiers::CONTROL)
            }
            _ => KeyEvent::new(event.code, event.modifiers),
        };
        self.bindings.get(&normalized).copied()
    }

    /// Help bar entries, one per hinted action
    pub fn hints(&self) -> Vec<KeybindingEntry> {
        HINT_ACTIONS
            .iter()
            .filter_map(|action| {
                // Prefer plain keys over Ctrl chords (Esc over ^C)
                let key = self
                    .bindings
                    .iter()
                    .filter(|(_, a)| *a == action)
                    .map(|(event, _)| format_key_event(event))
                    .min_by_key(|k| (k.starts_with('^'), k.clone()))?;
                Some(KeybindingEntry {
                    key,
                    description: action_description(action),
                })
            })
            .collect()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let prefix = if event.modifiers.contains(KeyModifiers::CONTROL) {
        "^"
    } else {
        ""
    };

    let key_str = match event.code {
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", prefix, key_str)
}

fn action_description(action: &Action) -> &'static str {
    match action {
        Action::Submit => "Convert to Email",
        Action::Copy => "Copy",
        Action::Clear => "Clear",
        Action::Left => "Cursor left",
        Action::Right => "Cursor right",
        Action::Home => "Line start",
        Action::End => "Line end",
        Action::ScrollUp => "Scroll up",
        Action::ScrollDown => "Scroll",
        Action::ToggleTheme => "Theme",
        Action::Quit => "Quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get(&ctrl_key('s')), Some(Action::Submit));
        assert_eq!(bindings.get(&ctrl_key('y')), Some(Action::Copy));
        assert_eq!(bindings.get(&key_code(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(bindings.get(&ctrl_key('c')), Some(Action::Quit));
        assert_eq!(bindings.get(&key_code(KeyCode::Char('s'))), None);
    }

    #[test]
    fn test_ctrl_shift_normalized() {
        let bindings = KeyBindings::new();
        let event = KeyEvent::new(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert_eq!(bindings.get(&event), Some(Action::Submit));

        let event = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::CONTROL);
        assert_eq!(bindings.get(&event), Some(Action::Submit));
    }

    #[test]
    fn test_hints() {
        let hints = KeyBindings::new().hints();
        assert_eq!(hints.len(), HINT_ACTIONS.len());
        assert_eq!(
            hints[0],
            KeybindingEntry {
                key: "^S".to_string(),
                description: "Convert to Email"
            }
        );
        assert_eq!(hints.last().map(|h| h.key.as_str()), Some("Esc"));
    }
}
