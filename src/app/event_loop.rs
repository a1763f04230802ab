//! Main event loop and draft event processing

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::ai::DraftEvent;
use crate::constants::{POLL_IDLE_MS, POLL_PENDING_MS};
use crate::input::{InputResult, handle_input};

use super::App;
use super::drafter::Phase;
use super::render_thread::RenderThread;

impl App {
    pub(crate) fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Finished drafts first, so the result shows on the next frame
            if self.process_draft_events() {
                self.dirty = true;
            }

            if self.state.clear_copied_if_expired() {
                self.dirty = true;
            }

            if self.state.status.clear_if_expired() {
                self.dirty = true;
            }

            // Pending drafts re-render every tick to animate the spinner
            let pending = self.state.drafter.is_pending();
            if self.dirty || pending {
                render_thread.render(self.state.clone());
                self.dirty = false;
            }

            let poll_timeout = if pending { POLL_PENDING_MS } else { POLL_IDLE_MS };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => self.handle_action(action, render_thread),
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Apply finished drafts. Returns true if any events were processed.
    pub(crate) fn process_draft_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.draft_actor.event_rx.try_recv() {
            had_events = true;
            match event {
                DraftEvent::Drafted { generation, state } => {
                    if !self.state.drafter.resolve(generation, state) {
                        continue;
                    }

                    let phase = self.state.drafter.phase();
                    tracing::info!(generation, ?phase, "Draft finished");
                    if phase == Phase::Success
                        && let Some(message) = self.state.drafter.form_state().message.clone()
                    {
                        self.state.status.set_message(message);
                    }
                }
            }
        }
        had_events
    }
}
