//! Backend transports for LexChat.
//!
//! Each transport implements `lexchat_core::Transport`: one ordered inbound
//! event stream per session plus an outbound send.
//!
//! Available transports:
//! - **SSE**: `POST` to the backend's streaming query endpoint
//! - **Memory**: In-process injection, for replays and tests

pub mod memory;
pub mod sse;

pub use memory::MemoryTransport;
pub use sse::{SseLine, SseTransport, parse_sse_line};
