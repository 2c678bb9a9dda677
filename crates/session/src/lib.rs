//! # LexChat Session
//!
//! Turns the backend's ordered event stream into a message list.
//!
//! [`MessageReconciler`] is the pure state machine: it grows the in-flight
//! bot message fragment by fragment and re-derives its artifacts each time.
//! [`ChatSession`] owns a transport and a reconciler and drives one turn at
//! a time.

pub mod reconciler;
pub mod session;

pub use reconciler::{Applied, MessageReconciler};
pub use session::{CONNECTION_CLOSED, ChatSession};
