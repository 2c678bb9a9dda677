//! Message reconciliation: turning an ordered event stream into messages.
//!
//! The reconciler owns a session's message list. Each fragment grows the
//! in-flight bot message and re-runs extraction over its whole raw text, so
//! the artifacts always reflect everything received so far. The in-flight
//! message is tracked by id, never by its position in the list.

use chrono::Utc;
use lexchat_core::{BackendEvent, EventKind, Message, MessageId, SessionError};
use lexchat_extract::extract;
use tracing::{debug, trace, warn};

/// What applying one event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new streaming bot message was opened.
    Opened(MessageId),
    /// The in-flight message grew.
    Appended(MessageId),
    /// The turn ended normally; carries the frozen message, if one was open.
    Finished(Option<MessageId>),
    /// The turn ended with an error; carries the new error message.
    Failed(MessageId),
    /// Nothing changed.
    Ignored,
}

impl Applied {
    /// True when the event closed the turn.
    pub fn ends_turn(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }

    /// The message this event touched, if any.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::Opened(id) | Self::Appended(id) | Self::Failed(id) => Some(id),
            Self::Finished(id) => id.as_ref(),
            Self::Ignored => None,
        }
    }
}

/// Per-session message state.
#[derive(Debug, Clone)]
pub struct MessageReconciler {
    /// Ordered messages, oldest first
    messages: Vec<Message>,

    /// The bot message currently receiving fragments
    in_flight: Option<MessageId>,

    /// Whether a turn is open (a send went out and no done/error came back)
    turn_open: bool,

    /// Agent name used when events don't carry one
    default_agent: String,
}

impl MessageReconciler {
    pub fn new(default_agent: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            in_flight: None,
            turn_open: false,
            default_agent: default_agent.into(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().rev().find(|m| &m.id == id)
    }

    /// The message currently receiving fragments.
    pub fn in_flight(&self) -> Option<&Message> {
        self.in_flight.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_turn_open(&self) -> bool {
        self.turn_open
    }

    pub fn set_default_agent(&mut self, agent: impl Into<String>) {
        self.default_agent = agent.into();
    }

    /// Record a user send and open a turn.
    ///
    /// Rejected while a previous turn is still streaming, and for blank text.
    pub fn begin_turn(&mut self, text: &str) -> Result<&Message, SessionError> {
        if self.turn_open {
            return Err(SessionError::TurnInFlight);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.turn_open = true;
        self.in_flight = None;
        self.messages.push(Message::user(text));
        debug!(chars = text.len(), "Turn opened");
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Apply one inbound event, in arrival order.
    pub fn apply(&mut self, event: &BackendEvent) -> Applied {
        match event.kind() {
            EventKind::Fragment { content, thinking } => self.apply_fragment(event, content, thinking),
            EventKind::Done => self.finish_turn(),
            EventKind::Error(text) => {
                let agent = event.agent.clone();
                self.fail_with(text, agent)
            }
            EventKind::Empty => {
                trace!("Ignoring empty event");
                Applied::Ignored
            }
        }
    }

    /// End the turn with an error that did not come from the backend
    /// (transport failure, closed stream).
    pub fn fail_turn(&mut self, text: &str) -> Applied {
        self.fail_with(text, None)
    }

    /// Append a client-side notice. Does not touch the open turn.
    pub fn notice(&mut self, text: &str) -> MessageId {
        let msg = Message::system(text);
        let id = msg.id.clone();
        self.messages.push(msg);
        id
    }

    /// Discard every message and any in-flight state.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.in_flight = None;
        self.turn_open = false;
    }

    fn apply_fragment(&mut self, event: &BackendEvent, content: &str, thinking: Option<&str>) -> Applied {
        if let Some(id) = self.in_flight.clone() {
            if let Some(msg) = self
                .messages
                .iter_mut()
                .rev()
                .find(|m| m.id == id && m.is_bot() && m.is_streaming)
            {
                msg.raw_content.push_str(content);
                if let Some(thinking) = thinking {
                    msg.push_thinking(thinking);
                }
                msg.apply_extraction(extract(&msg.raw_content));
                trace!(message_id = %id, len = msg.raw_content.len(), "Fragment appended");
                return Applied::Appended(id);
            }
            warn!(message_id = %id, "In-flight message vanished; opening a new one");
        }

        if !self.turn_open {
            debug!("Fragment arrived with no open turn; treating it as a new turn");
            self.turn_open = true;
        }

        let agent = event
            .agent
            .clone()
            .unwrap_or_else(|| self.default_agent.clone());
        let timestamp = event.parsed_timestamp().unwrap_or_else(Utc::now);
        let mut msg = Message::streaming(content, agent, timestamp);
        if let Some(thinking) = thinking {
            msg.push_thinking(thinking);
        }
        msg.apply_extraction(extract(&msg.raw_content));

        let id = msg.id.clone();
        debug!(message_id = %id, agent = %msg.agent, "Streaming message opened");
        self.messages.push(msg);
        self.in_flight = Some(id.clone());
        Applied::Opened(id)
    }

    fn finish_turn(&mut self) -> Applied {
        if !self.turn_open {
            debug!("Done with no open turn; ignoring");
            return Applied::Ignored;
        }
        self.turn_open = false;

        let frozen = self.in_flight.take();
        if let Some(id) = &frozen {
            if let Some(msg) = self.messages.iter_mut().rev().find(|m| &m.id == id) {
                msg.is_streaming = false;
                debug!(
                    message_id = %id,
                    artifacts = msg.artifacts.len(),
                    len = msg.raw_content.len(),
                    "Turn finished"
                );
            }
        }
        Applied::Finished(frozen)
    }

    fn fail_with(&mut self, text: &str, agent: Option<String>) -> Applied {
        // The in-flight message is left exactly as it was.
        let agent = agent
            .or_else(|| self.in_flight().map(|m| m.agent.clone()))
            .unwrap_or_else(|| self.default_agent.clone());
        let msg = Message::error(text, agent);
        let id = msg.id.clone();

        warn!(message_id = %id, error = %text, "Turn failed");
        self.messages.push(msg);
        self.in_flight = None;
        self.turn_open = false;
        Applied::Failed(id)
    }
}
