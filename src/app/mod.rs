//! Application core - manages state and coordinates the drafting actor

mod actions;
pub mod drafter;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;

use render_thread::RenderThread;

use crate::ai::{CompletionClient, DraftActorHandle, DraftCommand, spawn_draft_actor};
use crate::config::Config;
use crate::input::KeyBindings;
use state::AppState;

pub struct App {
    pub(crate) config: Config,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    pub(crate) draft_actor: DraftActorHandle,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    /// Build the app and spawn the drafting actor. Must run inside the runtime.
    pub fn new(config: Config, api_key: Option<String>) -> Result<Self> {
        let client = CompletionClient::from_config(&config.ai, api_key)?;
        let bindings = KeyBindings::new();
        let state = AppState {
            hints: bindings.hints(),
            ..AppState::new(client.model().to_string(), config.ui.theme)
        };
        let draft_actor = spawn_draft_actor(client);

        Ok(Self {
            config,
            state,
            bindings,
            draft_actor,
            dirty: true, // Start dirty for initial render
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        let result = self.event_loop(&render_thread);

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        // An in-flight request is abandoned with the actor
        self.draft_actor.cmd_tx.send(DraftCommand::Shutdown).await.ok();

        result
    }
}
