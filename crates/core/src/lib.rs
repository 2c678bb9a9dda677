//! # LexChat Core
//!
//! Domain types, traits, and error definitions for the LexChat streaming
//! chat client. This crate has **zero framework dependencies**. It defines
//! the model that the extractor, formatter, session and transports share.
//!
//! Data flows one way:
//! inbound fragment → session reconciler → extractor → formatter → view.

pub mod agent;
pub mod artifact;
pub mod error;
pub mod event;
pub mod message;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use agent::AgentKind;
pub use artifact::{Artifact, ArtifactKind, ExtractionResult};
pub use error::{Error, Result, SessionError, TransportError};
pub use event::{BackendEvent, EventKind, OutboundSend};
pub use message::{Message, MessageId, Role, SessionId};
pub use transport::{EventReceiver, Transport};
