//! `lexchat agents`: list the backend's agent roster.

use lexchat_core::AgentKind;

pub fn run() {
    println!();
    println!("  {:<20} {}", "KEY", "REPORTS AS");
    for kind in AgentKind::ALL {
        let marker = if kind == AgentKind::default() { "  (default)" } else { "" };
        println!("  {:<20} {}{marker}", kind.as_str(), kind.display_name());
    }
    println!();
}
