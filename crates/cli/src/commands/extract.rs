//! `lexchat extract`: run the artifact extractor over saved response text.

use std::path::PathBuf;

use lexchat_core::Role;
use lexchat_extract::extract;
use lexchat_format::{MessageView, format_artifact, format_text, render_text};

use super::render_options;

pub fn run(file: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    let result = extract(&text);
    tracing::debug!(artifacts = result.artifacts.len(), "Extraction complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let view = MessageView {
        role: Role::Bot,
        agent: String::new(),
        is_streaming: false,
        is_error: false,
        body: format_text(&result.conversational_content),
        artifacts: result.artifacts.iter().map(format_artifact).collect(),
        thinking: None,
    };
    println!("{}", render_text(&view, render_options()));
    Ok(())
}
