//! Drafting state machine
//!
//! `Idle -> Pending -> {Success, ValidationError, ServiceError}`; any terminal
//! state goes straight back to `Pending` on the next submission. Submissions are
//! refused while one is pending, and each carries a generation number so a
//! result that arrives for an older submission is discarded instead of
//! overwriting newer state.

use crate::ai::{FormData, FormState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Success,
    ValidationError,
    ServiceError,
}

impl Phase {
    /// Terminal phase implied by a finished form state
    fn of(state: &FormState) -> Self {
        if state.errors.is_some() {
            Phase::ValidationError
        } else if state.email.is_some() {
            Phase::Success
        } else {
            Phase::ServiceError
        }
    }
}

/// A submission accepted by [`Drafter::submit`], ready to hand to the actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub generation: u64,
    pub previous: FormState,
    pub form: FormData,
}

#[derive(Debug, Clone, Default)]
pub struct Drafter {
    form_state: FormState,
    phase: Phase,
    generation: u64,
}

impl Drafter {
    /// State to render. Keeps the last outcome while a new submission is pending.
    pub fn form_state(&self) -> &FormState {
        &self.form_state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Move to `Pending`. Returns `None` if a submission is already in flight.
    pub fn submit(&mut self, form: FormData) -> Option<Submission> {
        if self.is_pending() {
            tracing::debug!(generation = self.generation, "Submission refused while pending");
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Pending;

        Some(Submission {
            generation: self.generation,
            previous: self.form_state.clone(),
            form,
        })
    }

    /// Apply a finished submission. Returns false if it was stale and ignored.
    pub fn resolve(&mut self, generation: u64, state: FormState) -> bool {
        if !self.is_pending() || generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale draft result"
            );
            return false;
        }

        self.phase = Phase::of(&state);
        self.form_state = state;
        true
    }
}
