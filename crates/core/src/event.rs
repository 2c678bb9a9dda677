//! Wire events exchanged with the backend.
//!
//! Inbound, the backend sends one loose JSON object per event. Exactly one of
//! `content`, `done` or `error` is meaningful; `done` and `error` end the turn.
//! Outbound, the client sends one query per user turn.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentKind;
use crate::message::SessionId;

/// One inbound event, exactly as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What an inbound event means for the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// More text (and/or reasoning) for the in-flight message.
    Fragment {
        content: &'a str,
        thinking: Option<&'a str>,
    },
    /// The turn finished normally.
    Done,
    /// The turn failed; the payload is shown to the user.
    Error(&'a str),
    /// Nothing usable (e.g. `{}` or `{"content": ""}`).
    Empty,
}

impl BackendEvent {
    pub fn fragment(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn done() -> Self {
        Self {
            done: Some(true),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_thinking(mut self, thinking: impl Into<String>) -> Self {
        self.thinking = Some(thinking.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Classify the event. Error wins over done, done wins over content.
    pub fn kind(&self) -> EventKind<'_> {
        if let Some(err) = self.error.as_deref() {
            return EventKind::Error(err);
        }
        if self.done == Some(true) {
            return EventKind::Done;
        }
        let content = self.content.as_deref().unwrap_or_default();
        let thinking = self.thinking.as_deref().filter(|t| !t.is_empty());
        if content.is_empty() && thinking.is_none() {
            EventKind::Empty
        } else {
            EventKind::Fragment { content, thinking }
        }
    }

    /// Parse one JSON event.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// The event's timestamp, or `None` if absent or unreadable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Accepts RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// One outbound query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSend {
    pub message: String,
    pub agent_type: AgentKind,
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn classify_fragment() {
        let event = BackendEvent::from_json(r#"{"content":"Hello","agent":"LegalAdvisor"}"#).unwrap();
        assert_eq!(
            event.kind(),
            EventKind::Fragment {
                content: "Hello",
                thinking: None
            }
        );
        assert_eq!(event.agent.as_deref(), Some("LegalAdvisor"));
    }

    #[test]
    fn classify_done_and_error() {
        assert_eq!(BackendEvent::from_json(r#"{"done":true}"#).unwrap().kind(), EventKind::Done);
        assert_eq!(
            BackendEvent::from_json(r#"{"error":"boom"}"#).unwrap().kind(),
            EventKind::Error("boom")
        );
    }

    #[test]
    fn error_takes_priority() {
        let event = BackendEvent::from_json(r#"{"content":"x","done":true,"error":"late failure"}"#).unwrap();
        assert_eq!(event.kind(), EventKind::Error("late failure"));
    }

    #[test]
    fn done_false_is_not_done() {
        let event = BackendEvent::from_json(r#"{"done":false}"#).unwrap();
        assert_eq!(event.kind(), EventKind::Empty);
    }

    #[test]
    fn empty_payloads_are_empty() {
        assert_eq!(BackendEvent::from_json("{}").unwrap().kind(), EventKind::Empty);
        assert_eq!(BackendEvent::fragment("").kind(), EventKind::Empty);
    }

    #[test]
    fn thinking_only_is_fragment() {
        let event = BackendEvent::default().with_thinking("considering");
        assert_eq!(
            event.kind(),
            EventKind::Fragment {
                content: "",
                thinking: Some("considering")
            }
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let event = BackendEvent::from_json(r#"{"content":"a","extra":42}"#).unwrap();
        assert_eq!(event.content.as_deref(), Some("a"));
    }

    #[test]
    fn timestamp_formats() {
        let rfc = parse_timestamp("2024-05-01T10:20:30Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let naive = parse_timestamp("2024-05-01T10:20:30.123456").unwrap();
        assert_eq!(naive.day(), 1);
        assert_eq!(naive.minute(), 20);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(BackendEvent::fragment("x").parsed_timestamp().is_none());
    }

    #[test]
    fn outbound_wire_shape() {
        let send = OutboundSend {
            message: "Review this NDA".into(),
            agent_type: AgentKind::ContractAnalyzer,
            session_id: SessionId::from("s-1"),
            user_id: None,
        };
        let json = serde_json::to_value(&send).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Review this NDA",
                "agent_type": "contract_analyzer",
                "session_id": "s-1"
            })
        );
    }
}
