//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use std::time::Instant;

use crate::ai::FormData;
use crate::ai::draft::BULLET_POINTS_FIELD;
use crate::config::ThemeVariant;
use crate::constants::{COPY_CONFIRM_SECS, STATUS_TTL_SECS};
use crate::input::KeybindingEntry;

use super::drafter::Drafter;

/// Bullet-point editor contents. `cursor` is a byte offset on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub text: String,
    pub cursor: usize,
}

impl EditorState {
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Start of the current line
    pub fn move_home(&mut self) {
        self.cursor = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    /// End of the current line
    pub fn move_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Cursor position as (line, text before the cursor on that line)
    pub fn cursor_line(&self) -> (usize, &str) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, &before[line_start..])
    }

    /// Package the editor contents as a form submission
    pub fn to_form(&self) -> FormData {
        FormData::with_bullet_points(self.text.clone())
    }
}

/// Transient status line (notices that are not part of the form state)
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub is_error: bool,
    pub set_at: Option<Instant>,
}

impl StatusState {
    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = Some(msg.to_string());
        self.is_error = false;
        self.set_at = Some(Instant::now());
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.message = Some(error.to_string());
        self.is_error = true;
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.is_error = false;
        self.set_at = None;
    }

    /// Clear the status if TTL expired. Returns true if it was cleared.
    pub fn clear_if_expired(&mut self) -> bool {
        if let Some(time) = self.set_at
            && time.elapsed().as_secs() >= STATUS_TTL_SECS
        {
            self.clear();
            true
        } else {
            false
        }
    }
}

/// Snapshot of everything the UI renders
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub drafter: Drafter,
    pub editor: EditorState,
    pub status: StatusState,
    /// When the drafted email was last copied ("Copied!" indicator)
    pub copied_at: Option<Instant>,
    /// Vertical scroll of the drafted email panel
    pub output_scroll: u16,
    pub theme: ThemeVariant,
    /// Model name shown in the header
    pub model: String,
    /// Help bar entries, taken from the app's key bindings
    pub hints: Vec<KeybindingEntry>,
}

impl AppState {
    pub fn new(model: String, theme: ThemeVariant) -> Self {
        Self {
            model,
            theme,
            ..Default::default()
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at
            .is_some_and(|t| t.elapsed().as_secs() < COPY_CONFIRM_SECS)
    }

    /// Drop the "Copied!" indicator once expired. Returns true if it changed.
    pub fn clear_copied_if_expired(&mut self) -> bool {
        if self.copied_at.is_some() && !self.is_copied() {
            self.copied_at = None;
            true
        } else {
            false
        }
    }

    /// Validation messages for the bullet-point field
    pub fn bullet_point_errors(&self) -> &[String] {
        self.drafter.form_state().field_errors(BULLET_POINTS_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> EditorState {
        EditorState {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut ed = EditorState::default();
        for c in "• a".chars() {
            ed.insert_char(c);
        }
        assert_eq!(ed.text, "• a");
        ed.backspace();
        ed.backspace();
        assert_eq!(ed.text, "•");
        ed.backspace();
        assert_eq!(ed.text, "");
        assert_eq!(ed.cursor, 0);
        ed.backspace();
        assert_eq!(ed.cursor, 0);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut ed = editor("ac");
        ed.move_left();
        ed.insert_char('b');
        assert_eq!(ed.text, "abc");
        assert_eq!(ed.cursor, 2);
    }

    #[test]
    fn test_home_end_per_line() {
        let mut ed = editor("first\nsecond");
        ed.move_home();
        assert_eq!(ed.cursor, 6);
        ed.move_left();
        ed.move_home();
        assert_eq!(ed.cursor, 0);
        ed.move_end();
        assert_eq!(ed.cursor, 5);
    }

    #[test]
    fn test_cursor_line() {
        let ed = editor("- one\n- tw");
        assert_eq!(ed.cursor_line(), (1, "- tw"));
        assert_eq!(EditorState::default().cursor_line(), (0, ""));
    }

    #[test]
    fn test_to_form_uses_bullet_points_field() {
        let form = editor(" - a\n").to_form();
        assert_eq!(form.get(BULLET_POINTS_FIELD), Some(" - a\n"));
    }

    #[test]
    fn test_copied_indicator_expires() {
        let mut state = AppState::default();
        assert!(!state.is_copied());

        state.copied_at = Some(Instant::now());
        assert!(state.is_copied());
        assert!(!state.clear_copied_if_expired());

        state.copied_at = Instant::now().checked_sub(std::time::Duration::from_secs(COPY_CONFIRM_SECS + 1));
        assert!(!state.is_copied());
        assert!(state.clear_copied_if_expired());
        assert!(state.copied_at.is_none());
    }

    #[test]
    fn test_status_expiry() {
        let mut status = StatusState::default();
        status.set_error("boom");
        assert!(status.is_error);
        assert!(!status.clear_if_expired());

        status.set_at = Instant::now().checked_sub(std::time::Duration::from_secs(STATUS_TTL_SECS));
        assert!(status.clear_if_expired());
        assert!(status.message.is_none());
    }
}
