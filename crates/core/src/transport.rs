//! Transport trait: the abstraction over the backend channel.
//!
//! A session needs exactly two things from the wire: one ordered stream of
//! inbound events and one way to send a query. Everything else the backend
//! offers (history, uploads, knowledge search) is outside the client core.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::event::{BackendEvent, OutboundSend};
use crate::message::SessionId;

/// Receiving half of a connected transport.
pub type EventReceiver = mpsc::Receiver<Result<BackendEvent, TransportError>>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name (e.g., "sse", "memory").
    fn name(&self) -> &str;

    /// Open the inbound stream for a session.
    ///
    /// Events for the session arrive on the returned receiver strictly in
    /// the order the backend produced them. Connecting again replaces the
    /// previous stream.
    async fn connect(&self, session_id: &SessionId) -> Result<EventReceiver, TransportError>;

    /// Send one user query.
    async fn send(&self, request: &OutboundSend) -> Result<(), TransportError>;

    /// Tear down the inbound stream. Outstanding events are dropped.
    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
