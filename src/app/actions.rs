//! Action handlers for user input

use std::time::Instant;

use crate::ai::draft::MSG_FAILURE_PREFIX;
use crate::ai::{DraftCommand, DraftResult, FormState};
use crate::input::Action;

use super::App;
use super::drafter::Submission;
use super::render_thread::RenderThread;

/// Lines moved per scroll step in the drafted email panel
const SCROLL_STEP: u16 = 5;

impl App {
    pub(crate) fn handle_action(&mut self, action: Action, render_thread: &RenderThread) {
        match action {
            Action::Submit => self.submit(),
            Action::Copy => self.copy_email(render_thread),
            Action::Clear => self.state.editor.clear(),

            Action::Left => self.state.editor.move_left(),
            Action::Right => self.state.editor.move_right(),
            Action::Home => self.state.editor.move_home(),
            Action::End => self.state.editor.move_end(),

            Action::ScrollUp => {
                self.state.output_scroll = self.state.output_scroll.saturating_sub(SCROLL_STEP);
            }
            Action::ScrollDown => self.scroll_output_down(),

            Action::ToggleTheme => self.toggle_theme(),
            Action::Quit => {} // Handled in event loop
        }
    }

    pub(crate) fn handle_char(&mut self, c: char) {
        self.state.editor.insert_char(c);
    }

    pub(crate) fn handle_backspace(&mut self) {
        self.state.editor.backspace();
    }

    /// Scroll the drafted email, stopping at its last line
    fn scroll_output_down(&mut self) {
        let lines = self
            .state
            .drafter
            .form_state()
            .email
            .as_deref()
            .map_or(0, |email| email.lines().count());
        let max = u16::try_from(lines).unwrap_or(u16::MAX).saturating_sub(1);
        self.state.output_scroll = self
            .state
            .output_scroll
            .saturating_add(SCROLL_STEP)
            .min(max);
    }

    /// Submit the bullet points to the drafting actor
    fn submit(&mut self) {
        let form = self.state.editor.to_form();
        let Some(Submission {
            generation,
            previous,
            form,
        }) = self.state.drafter.submit(form)
        else {
            self.state.status.set_message("Already drafting, please wait");
            return;
        };

        self.state.status.clear();
        self.state.copied_at = None;
        self.state.output_scroll = 0;

        let cmd = DraftCommand::Draft {
            generation,
            previous,
            form,
        };
        if let Err(e) = self.draft_actor.cmd_tx.try_send(cmd) {
            tracing::error!("Failed to queue draft: {}", e);
            let state = FormState::from(DraftResult::ServiceError {
                message: format!("{}drafting service unavailable", MSG_FAILURE_PREFIX),
            });
            self.state.drafter.resolve(generation, state);
        }
    }

    fn copy_email(&mut self, render_thread: &RenderThread) {
        let Some(email) = self.state.drafter.form_state().email.clone() else {
            self.state.status.set_message("Nothing to copy yet");
            return;
        };

        if render_thread.copy_to_clipboard(email) {
            self.state.copied_at = Some(Instant::now());
        } else {
            self.state.status.set_error("Clipboard unavailable");
        }
    }

    fn toggle_theme(&mut self) {
        let next = self.state.theme.next();
        crate::ui::theme::set_theme(next);
        self.state.theme = next;
        self.config.ui.theme = next;

        // Best effort: the session keeps the theme even if saving fails
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save theme preference: {}", e);
        }
        self.state
            .status
            .set_message(format!("Theme: {}", next.name()));
    }
}
