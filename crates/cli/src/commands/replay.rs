//! `lexchat replay`: feed a recorded event stream through a session.
//!
//! The input is NDJSON. Each line is either an inbound backend event
//! (`{"content": ...}`, `{"done": true}`, `{"error": ...}`) or a user send
//! written as `{"user": "text"}`. Blank lines and `#` comments are skipped.

use std::path::PathBuf;
use std::sync::Arc;

use lexchat_channels::MemoryTransport;
use lexchat_core::{AgentKind, BackendEvent, Message, SessionId};
use lexchat_session::ChatSession;
use tracing::warn;

use super::{print_message, render_options};

pub async fn run(file: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = std::fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let messages = replay(&input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    let opts = render_options();
    println!();
    for message in &messages {
        print_message(message, opts);
    }
    Ok(())
}

/// Run every line through a fresh in-memory session and return the
/// resulting message list.
pub async fn replay(input: &str) -> Result<Vec<Message>, Box<dyn std::error::Error>> {
    let transport = Arc::new(MemoryTransport::default());
    let mut chat = ChatSession::open(transport.clone(), SessionId::new(), AgentKind::default()).await?;

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| format!("line {}: {e}", i + 1))?;

        if let Some(text) = value.get("user").and_then(|v| v.as_str()) {
            if let Err(e) = chat.send(text).await {
                warn!(line = i + 1, error = %e, "User send rejected");
            }
            continue;
        }

        let event: BackendEvent =
            serde_json::from_value(value).map_err(|e| format!("line {}: {e}", i + 1))?;
        transport.push_event(event).await?;
        chat.next_event().await?;
    }

    Ok(chat.close().await?)
}
