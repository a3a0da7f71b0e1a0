//! Single-writer session service
//!
//! Utterances and position-stream fixes race in real deployments. Instead of
//! locking the session, one task owns it and everything else goes through a
//! command channel; commands apply strictly in arrival order, so the latest
//! request always wins.

use tokio::sync::{mpsc, oneshot};

use wayfinder_core::{ChangeSource, NavigationSession, NodeId};

use crate::orchestrator::{AgentReply, Orchestrator};
use crate::AgentError;

const COMMAND_BUFFER: usize = 32;

enum SessionCommand {
    Utterance {
        text: String,
        reply_tx: oneshot::Sender<AgentReply>,
    },
    LocationUpdate {
        node_id: NodeId,
    },
    SetGate {
        gate: String,
    },
    Snapshot {
        reply_tx: oneshot::Sender<NavigationSession>,
    },
    Shutdown,
}

/// Spawns the state-owning task for one session
pub struct SessionService;

impl SessionService {
    pub fn spawn(orchestrator: Orchestrator) -> SessionHandle {
        let (tx, mut rx) = mpsc::channel::<SessionCommand>(COMMAND_BUFFER);

        tokio::spawn(async move {
            let mut session = NavigationSession::new();
            tracing::info!(session_id = %session.session_id, "session service started");

            while let Some(command) = rx.recv().await {
                match command {
                    SessionCommand::Utterance { text, reply_tx } => {
                        let reply = orchestrator.handle_utterance(&mut session, &text);
                        // A dropped receiver just means the caller gave up waiting.
                        let _ = reply_tx.send(reply);
                    }
                    SessionCommand::LocationUpdate { node_id } => {
                        let reply = orchestrator.apply_location_update(&mut session, &node_id);
                        tracing::debug!(spoken = %reply.spoken, "position fix applied");
                    }
                    SessionCommand::SetGate { gate } => {
                        session.set_user_gate(gate, ChangeSource::Utterance);
                    }
                    SessionCommand::Snapshot { reply_tx } => {
                        let _ = reply_tx.send(session.clone());
                    }
                    SessionCommand::Shutdown => break,
                }
            }

            tracing::info!(session_id = %session.session_id, "session service stopped");
        });

        SessionHandle { tx }
    }
}

/// Cloneable handle onto the session task
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Process one utterance and wait for the spoken reply
    pub async fn utterance(&self, text: impl Into<String>) -> Result<AgentReply, AgentError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Utterance {
            text: text.into(),
            reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| AgentError::SessionClosed)
    }

    /// Feed a position-stream fix; fire and forget
    pub async fn update_location(&self, node_id: NodeId) -> Result<(), AgentError> {
        self.send(SessionCommand::LocationUpdate { node_id }).await
    }

    pub async fn set_gate(&self, gate: impl Into<String>) -> Result<(), AgentError> {
        self.send(SessionCommand::SetGate { gate: gate.into() }).await
    }

    /// Copy of the session state as of all previously sent commands
    pub async fn snapshot(&self) -> Result<NavigationSession, AgentError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot { reply_tx }).await?;
        reply_rx.await.map_err(|_| AgentError::SessionClosed)
    }

    pub async fn shutdown(&self) -> Result<(), AgentError> {
        self.send(SessionCommand::Shutdown).await
    }

    async fn send(&self, command: SessionCommand) -> Result<(), AgentError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| AgentError::SessionClosed)
    }
}
