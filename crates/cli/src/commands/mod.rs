pub mod agents;
pub mod chat;
pub mod config_cmd;
pub mod extract;
pub mod replay;

use lexchat_core::{Message, Role};
use lexchat_format::{RenderOptions, format_message, render_text};
use std::io::IsTerminal;

/// ANSI styling only when stdout is a terminal.
pub fn render_options() -> RenderOptions {
    RenderOptions {
        ansi: std::io::stdout().is_terminal(),
    }
}

/// Print one message the way the chat view shows it.
pub fn print_message(message: &Message, opts: RenderOptions) {
    if message.is_error {
        println!("  [Error] {}", message.conversational_content);
        return;
    }
    let label = match message.role {
        Role::User => "You",
        Role::Bot => message.agent.as_str(),
        Role::System => "System",
    };
    println!("  {label} >");
    for line in render_text(&format_message(message), opts).lines() {
        println!("    {line}");
    }
    println!();
}
