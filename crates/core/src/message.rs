//! Message and session domain types.
//!
//! These are the value objects the chat client renders:
//! User sends text → backend streams fragments → reconciler grows a bot
//! message → extractor splits it into a conversational remainder and artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::{Artifact, ExtractionResult};

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person at the keyboard
    User,
    /// A backend agent (or the agent team)
    Bot,
    /// Client-side notices
    System,
}

/// A single message in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,

    /// Who sent this message
    pub role: Role,

    /// Everything received for this message, in arrival order
    pub raw_content: String,

    /// What remains of `raw_content` once artifacts are pulled out
    pub conversational_content: String,

    /// Artifacts derived from `raw_content`, in extraction order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// True while fragments may still be appended
    #[serde(default)]
    pub is_streaming: bool,

    /// True for terminal messages produced by a backend error
    #[serde(default)]
    pub is_error: bool,

    /// Display name of the authoring agent ("You" for user messages)
    pub agent: String,

    /// When the message was opened
    pub timestamp: DateTime<Utc>,

    /// Reasoning text streamed alongside the answer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

impl Message {
    /// Create a user message. User text is shown verbatim, never extracted.
    pub fn user(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: MessageId::new(),
            role: Role::User,
            conversational_content: content.clone(),
            raw_content: content,
            artifacts: Vec::new(),
            is_streaming: false,
            is_error: false,
            agent: "You".into(),
            timestamp: Utc::now(),
            thinking: None,
        }
    }

    /// Open a bot message for a new turn. The caller runs extraction.
    pub fn streaming(
        fragment: impl Into<String>,
        agent: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Bot,
            raw_content: fragment.into(),
            conversational_content: String::new(),
            artifacts: Vec::new(),
            is_streaming: true,
            is_error: false,
            agent: agent.into(),
            timestamp,
            thinking: None,
        }
    }

    /// Create a terminal bot message carrying a backend error.
    pub fn error(text: impl Into<String>, agent: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: MessageId::new(),
            role: Role::Bot,
            conversational_content: text.clone(),
            raw_content: text,
            artifacts: Vec::new(),
            is_streaming: false,
            is_error: true,
            agent: agent.into(),
            timestamp: Utc::now(),
            thinking: None,
        }
    }

    /// Create a client-side notice.
    pub fn system(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: MessageId::new(),
            role: Role::System,
            conversational_content: content.clone(),
            raw_content: content,
            artifacts: Vec::new(),
            is_streaming: false,
            is_error: false,
            agent: "system".into(),
            timestamp: Utc::now(),
            thinking: None,
        }
    }

    /// Overwrite the derived fields with a fresh extraction.
    pub fn apply_extraction(&mut self, result: ExtractionResult) {
        self.conversational_content = result.conversational_content;
        self.artifacts = result.artifacts;
    }

    /// Append reasoning text, creating the buffer on first use.
    pub fn push_thinking(&mut self, text: &str) {
        self.thinking.get_or_insert_with(String::new).push_str(text);
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}
