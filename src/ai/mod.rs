//! Email drafting core
//!
//! Turns bullet points into an email by way of a chat-completion provider:
//! - Prompt construction (system instruction + bullet-point template)
//! - The completion client and its error taxonomy
//! - Bold-markdown clean-up of the generated text
//! - The drafting action and the actor that runs it in the background

mod actor;
mod client;
pub mod draft;
mod error;
pub mod prompts;
pub mod sanitize;

pub use actor::{DraftActorHandle, DraftCommand, DraftEvent, spawn_draft_actor};
pub use client::{Completer, CompletionClient};
pub use draft::{DraftResult, FormData, FormState, run_draft};
pub use error::CompletionError;
