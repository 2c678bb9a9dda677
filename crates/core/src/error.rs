//! Error types for the LexChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all LexChat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Transport errors ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // --- Session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Transport not connected: {0}")]
    NotConnected(String),

    #[error("Send failed on {transport}: {reason}")]
    SendFailed { transport: String, reason: String },

    #[error("Backend returned HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A response is still streaming; wait for it to finish")]
    TurnInFlight,

    #[error("Refusing to send an empty message")]
    EmptyMessage,

    #[error("Session {0} is closed")]
    Closed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_correctly() {
        let err = Error::Transport(TransportError::Http {
            status_code: 500,
            message: "Invalid agent type".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Invalid agent type"));
    }

    #[test]
    fn session_error_converts() {
        let err: Error = SessionError::TurnInFlight.into();
        assert!(matches!(err, Error::Session(SessionError::TurnInFlight)));
        assert!(err.to_string().contains("still streaming"));
    }
}
