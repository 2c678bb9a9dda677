//! The chat session: one transport, one event stream, one reconciler.
//!
//! A `ChatSession` is owned by a single task. Every mutation of its message
//! list happens on that task, in the order events come off the transport's
//! receiver, so fragments can never interleave out of order.

use std::sync::Arc;

use lexchat_core::{
    AgentKind, EventReceiver, Message, MessageId, OutboundSend, Result, SessionError, SessionId,
    Transport,
};
use tracing::{debug, info, warn};

use crate::reconciler::{Applied, MessageReconciler};

/// Error text shown when the inbound stream ends mid-turn.
pub const CONNECTION_CLOSED: &str = "Connection closed before the response finished";

pub struct ChatSession {
    id: SessionId,
    agent: AgentKind,
    user_id: Option<String>,
    transport: Arc<dyn Transport>,
    events: Option<EventReceiver>,
    reconciler: MessageReconciler,
}

impl ChatSession {
    /// Connect `transport` for session `id`.
    pub async fn open(transport: Arc<dyn Transport>, id: SessionId, agent: AgentKind) -> Result<Self> {
        let events = transport.connect(&id).await?;
        info!(session_id = %id, transport = transport.name(), agent = %agent, "Session opened");
        Ok(Self {
            id,
            agent,
            user_id: None,
            transport,
            events: Some(events),
            reconciler: MessageReconciler::new(agent.display_name()),
        })
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    /// Route subsequent sends to a different agent.
    pub fn set_agent(&mut self, agent: AgentKind) {
        if agent == self.agent {
            return;
        }
        debug!(session_id = %self.id, from = %self.agent, to = %agent, "Agent switched");
        self.agent = agent;
        self.reconciler.set_default_agent(agent.display_name());
        self.reconciler
            .notice(&format!("Now talking to {}", agent.display_name()));
    }

    pub fn messages(&self) -> &[Message] {
        self.reconciler.messages()
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.reconciler.get(id)
    }

    pub fn reconciler(&self) -> &MessageReconciler {
        &self.reconciler
    }

    pub fn is_turn_open(&self) -> bool {
        self.reconciler.is_turn_open()
    }

    /// Send a user message and open a turn.
    ///
    /// If the transport rejects the send, the turn is closed with an error
    /// message and the transport error is returned.
    pub async fn send(&mut self, text: &str) -> Result<MessageId> {
        if self.events.is_none() {
            return Err(SessionError::Closed(self.id.to_string()).into());
        }
        let user = self.reconciler.begin_turn(text)?;
        let user_id = user.id.clone();
        let request = OutboundSend {
            message: user.raw_content.clone(),
            agent_type: self.agent,
            session_id: self.id.clone(),
            user_id: self.user_id.clone(),
        };

        debug!(session_id = %self.id, agent = %self.agent, "Sending message");
        if let Err(e) = self.transport.send(&request).await {
            warn!(session_id = %self.id, error = %e, "Send failed");
            self.reconciler.fail_turn(&e.to_string());
            return Err(e.into());
        }
        Ok(user_id)
    }

    /// Wait for the next inbound event and apply it.
    ///
    /// Transport errors on the stream end the turn as error messages rather
    /// than failing the call. A closed stream with no turn open is reported
    /// as `SessionError::Closed`.
    pub async fn next_event(&mut self) -> Result<Applied> {
        let Some(events) = self.events.as_mut() else {
            return Err(SessionError::Closed(self.id.to_string()).into());
        };

        match events.recv().await {
            Some(Ok(event)) => Ok(self.reconciler.apply(&event)),
            Some(Err(e)) => {
                warn!(session_id = %self.id, error = %e, "Inbound stream error");
                Ok(self.reconciler.fail_turn(&e.to_string()))
            }
            None => {
                self.events = None;
                if self.reconciler.is_turn_open() {
                    warn!(session_id = %self.id, "Stream closed mid-turn");
                    Ok(self.reconciler.fail_turn(CONNECTION_CLOSED))
                } else {
                    debug!(session_id = %self.id, "Stream closed");
                    Err(SessionError::Closed(self.id.to_string()).into())
                }
            }
        }
    }

    /// Drive events until the open turn ends, calling `on_update` with the
    /// touched message after every change.
    pub async fn run_turn<F>(&mut self, mut on_update: F) -> Result<()>
    where
        F: FnMut(&Message),
    {
        while self.reconciler.is_turn_open() {
            let applied = self.next_event().await?;
            if let Some(msg) = applied.message_id().and_then(|id| self.reconciler.get(id)) {
                on_update(msg);
            }
            if applied.ends_turn() {
                break;
            }
        }
        Ok(())
    }

    /// Switch to a new session id. The old stream is torn down without
    /// waiting for in-flight events, and all messages are discarded.
    pub async fn replace(&mut self, id: SessionId) -> Result<()> {
        self.events = None;
        if let Err(e) = self.transport.close().await {
            warn!(session_id = %self.id, error = %e, "Close failed during replace");
        }
        self.reconciler.reset();

        info!(old = %self.id, new = %id, "Session replaced");
        self.id = id;
        self.events = Some(self.transport.connect(&self.id).await?);
        Ok(())
    }

    /// Tear down the transport. Returns the final message list.
    pub async fn close(mut self) -> Result<Vec<Message>> {
        self.events = None;
        self.transport.close().await?;
        info!(session_id = %self.id, messages = self.reconciler.messages().len(), "Session closed");
        Ok(self.reconciler.messages().to_vec())
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("agent", &self.agent)
            .field("transport", &self.transport.name())
            .field("connected", &self.events.is_some())
            .field("messages", &self.reconciler.messages().len())
            .finish()
    }
}
