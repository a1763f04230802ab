//! Drafting actor for running completion requests off the UI loop

use tokio::sync::mpsc;

use super::client::Completer;
use super::draft::{FormData, FormState, draft_email};
use crate::constants::DRAFT_CHANNEL_CAPACITY;

/// Commands that can be sent to the drafting actor
#[derive(Debug)]
pub enum DraftCommand {
    /// Draft an email from a submitted form
    Draft {
        generation: u64,
        previous: FormState,
        form: FormData,
    },
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted by the drafting actor
#[derive(Debug, Clone)]
pub enum DraftEvent {
    /// A submission finished (successfully or not)
    Drafted { generation: u64, state: FormState },
}

/// Handle for communicating with the drafting actor
pub struct DraftActorHandle {
    pub cmd_tx: mpsc::Sender<DraftCommand>,
    pub event_rx: mpsc::Receiver<DraftEvent>,
}

/// Spawn the drafting actor task
pub fn spawn_draft_actor<C>(completer: C) -> DraftActorHandle
where
    C: Completer + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(DRAFT_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(DRAFT_CHANNEL_CAPACITY);

    tokio::spawn(draft_actor_loop(completer, cmd_rx, event_tx));

    DraftActorHandle { cmd_tx, event_rx }
}

async fn draft_actor_loop<C: Completer>(
    completer: C,
    mut cmd_rx: mpsc::Receiver<DraftCommand>,
    event_tx: mpsc::Sender<DraftEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            DraftCommand::Draft {
                generation,
                previous,
                form,
            } => {
                tracing::debug!(generation, "Draft actor: starting submission");
                let state = draft_email(&completer, &previous, &form).await;

                if event_tx
                    .send(DraftEvent::Drafted { generation, state })
                    .await
                    .is_err()
                {
                    tracing::warn!("Draft actor: event receiver dropped");
                    break;
                }
            }

            DraftCommand::Shutdown => {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::draft::{MSG_SUCCESS, MSG_VALIDATION};
    use crate::ai::error::CompletionError;
    use crate::ai::prompts::PromptEnvelope;
    use std::future::Future;

    /// Echoes the user message back wrapped in bold
    struct Echo;

    impl Completer for Echo {
        fn complete(
            &self,
            envelope: PromptEnvelope,
        ) -> impl Future<Output = Result<String, CompletionError>> + Send {
            let text = format!("**{}**", envelope.user().content.lines().last().unwrap_or(""));
            async move { Ok(text) }
        }
    }

    #[tokio::test]
    async fn test_actor_drafts_and_reports_generation() {
        let mut handle = spawn_draft_actor(Echo);

        handle
            .cmd_tx
            .send(DraftCommand::Draft {
                generation: 7,
                previous: FormState::default(),
                form: FormData::with_bullet_points("- launch"),
            })
            .await
            .unwrap();

        let DraftEvent::Drafted { generation, state } = handle.event_rx.recv().await.unwrap();
        assert_eq!(generation, 7);
        assert_eq!(state.email.as_deref(), Some("- launch"));
        assert_eq!(state.message.as_deref(), Some(MSG_SUCCESS));
    }

    #[tokio::test]
    async fn test_actor_processes_in_order_and_shuts_down() {
        let mut handle = spawn_draft_actor(Echo);

        for (generation, text) in [(1, ""), (2, "- second")] {
            handle
                .cmd_tx
                .send(DraftCommand::Draft {
                    generation,
                    previous: FormState::default(),
                    form: FormData::with_bullet_points(text),
                })
                .await
                .unwrap();
        }
        handle.cmd_tx.send(DraftCommand::Shutdown).await.unwrap();

        let DraftEvent::Drafted { generation, state } = handle.event_rx.recv().await.unwrap();
        assert_eq!(generation, 1);
        assert_eq!(state.message.as_deref(), Some(MSG_VALIDATION));

        let DraftEvent::Drafted { generation, .. } = handle.event_rx.recv().await.unwrap();
        assert_eq!(generation, 2);

        // Actor exited and dropped its sender
        assert!(handle.event_rx.recv().await.is_none());
    }
}
