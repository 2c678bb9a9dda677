//! In-process transport.
//!
//! Events are injected by hand (or scripted as canned replies that play out
//! after the next send) and outbound sends are recorded. Used by `replay`
//! and by tests that drive a full session without a backend.

use async_trait::async_trait;
use lexchat_core::{BackendEvent, EventReceiver, OutboundSend, SessionId, Transport, TransportError};
use std::collections::VecDeque;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

type EventSender = mpsc::Sender<Result<BackendEvent, TransportError>>;

pub struct MemoryTransport {
    buffer: usize,
    /// Inbound sender for the connected session
    inject_tx: Mutex<Option<EventSender>>,
    /// Session the inbound stream belongs to
    session: Mutex<Option<SessionId>>,
    /// Every request passed to `send`, in order
    sent: Mutex<Vec<OutboundSend>>,
    /// Canned replies, one per future send
    replies: Mutex<VecDeque<Vec<BackendEvent>>>,
}

impl MemoryTransport {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            inject_tx: Mutex::new(None),
            session: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    /// Deliver one event to the connected session.
    pub async fn push_event(&self, event: BackendEvent) -> Result<(), TransportError> {
        self.push(Ok(event)).await
    }

    /// Deliver a stream failure to the connected session.
    pub async fn push_error(&self, error: TransportError) -> Result<(), TransportError> {
        self.push(Err(error)).await
    }

    async fn push(&self, item: Result<BackendEvent, TransportError>) -> Result<(), TransportError> {
        let tx = self
            .inject_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| TransportError::NotConnected("memory transport not connected".into()))?;
        tx.send(item)
            .await
            .map_err(|_| TransportError::StreamInterrupted("session receiver dropped".into()))
    }

    /// Queue a reply that is played out after the next `send`.
    pub async fn script_reply(&self, events: Vec<BackendEvent>) {
        self.replies.lock().await.push_back(events);
    }

    /// Requests sent so far.
    pub async fn sent(&self) -> Vec<OutboundSend> {
        self.sent.lock().await.clone()
    }

    /// Session currently connected, if any.
    pub async fn connected_session(&self) -> Option<SessionId> {
        self.session.lock().await.clone()
    }

    /// Drop the inbound sender, as if the backend hung up.
    pub async fn hang_up(&self) {
        self.inject_tx.lock().await.take();
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self, session_id: &SessionId) -> Result<EventReceiver, TransportError> {
        info!(session_id = %session_id, "Memory transport connected");
        let (tx, rx) = mpsc::channel(self.buffer);
        *self.inject_tx.lock().await = Some(tx);
        *self.session.lock().await = Some(session_id.clone());
        Ok(rx)
    }

    async fn send(&self, request: &OutboundSend) -> Result<(), TransportError> {
        let tx = self
            .inject_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| TransportError::NotConnected("memory transport not connected".into()))?;
        self.sent.lock().await.push(request.clone());

        if let Some(reply) = self.replies.lock().await.pop_front() {
            debug!(events = reply.len(), "Playing scripted reply");
            // Played from a task so a reply longer than the buffer cannot
            // block the sender.
            tokio::spawn(async move {
                for event in reply {
                    if tx.send(Ok(event)).await.is_err() {
                        return;
                    }
                }
            });
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        info!("Memory transport closed");
        self.inject_tx.lock().await.take();
        self.session.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexchat_core::AgentKind;

    fn request(text: &str) -> OutboundSend {
        OutboundSend {
            message: text.into(),
            agent_type: AgentKind::LegalAdvisor,
            session_id: SessionId::from("s"),
            user_id: None,
        }
    }

    #[test]
    fn transport_name() {
        assert_eq!(MemoryTransport::default().name(), "memory");
    }

    #[tokio::test]
    async fn push_before_connect_fails() {
        let t = MemoryTransport::default();
        let err = t.push_event(BackendEvent::done()).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected(_)));
        assert!(t.send(&request("hi")).await.is_err());
    }

    #[tokio::test]
    async fn pushed_events_arrive_in_order() {
        let t = MemoryTransport::default();
        let mut rx = t.connect(&SessionId::from("s")).await.unwrap();
        t.push_event(BackendEvent::fragment("a")).await.unwrap();
        t.push_event(BackendEvent::fragment("b")).await.unwrap();
        t.push_error(TransportError::Network("gone".into())).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().unwrap().content.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.unwrap().unwrap().content.as_deref(), Some("b"));
        assert!(rx.recv().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn scripted_reply_follows_send() {
        let t = MemoryTransport::new(1);
        let mut rx = t.connect(&SessionId::from("s")).await.unwrap();
        t.script_reply(vec![
            BackendEvent::fragment("one"),
            BackendEvent::fragment("two"),
            BackendEvent::done(),
        ])
        .await;

        t.send(&request("hello")).await.unwrap();
        assert_eq!(t.sent().await.len(), 1);

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap().unwrap());
        }
        assert_eq!(seen[1].content.as_deref(), Some("two"));
        assert_eq!(seen[2].done, Some(true));
    }

    #[tokio::test]
    async fn close_ends_stream() {
        let t = MemoryTransport::default();
        let mut rx = t.connect(&SessionId::from("s")).await.unwrap();
        assert_eq!(t.connected_session().await, Some(SessionId::from("s")));
        t.close().await.unwrap();
        assert!(rx.recv().await.is_none());
        assert!(t.connected_session().await.is_none());
    }
}
