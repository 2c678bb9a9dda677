//! `lexchat chat`: interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use lexchat_channels::SseTransport;
use lexchat_config::AppConfig;
use lexchat_core::{AgentKind, SessionId};
use lexchat_format::RenderOptions;
use lexchat_session::ChatSession;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_message, render_options};

pub async fn run(
    agent: Option<String>,
    session: Option<String>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let agent = match agent {
        Some(key) => key.parse::<AgentKind>()?,
        None => config.default_agent(),
    };
    let session_id = session
        .map(|s| SessionId::from(s.as_str()))
        .unwrap_or_default();

    let transport = Arc::new(SseTransport::from_config(&config)?);
    let url = transport.url().to_string();
    let mut chat = ChatSession::open(transport, session_id, agent)
        .await?
        .with_user_id(config.session.user_id.clone());
    let opts = render_options();

    if let Some(msg) = message {
        // Single message mode
        let result = ask(&mut chat, &msg, opts).await;
        chat.close().await?;
        return result;
    }

    // Interactive mode
    println!();
    println!("  LexChat: Interactive Mode");
    println!();
    println!("  Backend:  {url}");
    println!("  Agent:    {} ({})", agent.display_name(), agent.as_str());
    println!("  Session:  {}", chat.id());
    println!();
    println!("  Type your message and press Enter.");
    println!("  '/new' starts a fresh session, '/agent <key>' switches agent,");
    println!("  'exit' or Ctrl+D quits.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "exit" | "quit" => break,
            "/new" => {
                chat.replace(SessionId::new()).await?;
                println!("  New session: {}", chat.id());
                println!();
            }
            _ if line.starts_with("/agent") => {
                match line["/agent".len()..].parse::<AgentKind>() {
                    Ok(kind) => {
                        chat.set_agent(kind);
                        println!("  Agent: {}", kind.display_name());
                    }
                    Err(e) => eprintln!("  [Error] {e}"),
                }
                println!();
            }
            _ => {
                if let Err(e) = ask(&mut chat, line, opts).await {
                    eprintln!("  [Error] {e}");
                    println!();
                }
            }
        }
        prompt()?;
    }

    chat.close().await?;
    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Send one message and stream the reply. Raw fragments go to stderr as
/// they arrive; the formatted message goes to stdout once the turn ends.
async fn ask(
    chat: &mut ChatSession,
    text: &str,
    opts: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = chat.send(text).await {
        if let Some(last) = chat.messages().last().filter(|m| m.is_error) {
            print_message(last, opts);
        }
        return Err(e.into());
    }

    let mut printed = 0;
    chat.run_turn(|msg| {
        if msg.is_error || msg.raw_content.len() <= printed {
            return;
        }
        eprint!("{}", &msg.raw_content[printed..]);
        printed = msg.raw_content.len();
    })
    .await?;
    if printed > 0 {
        eprintln!();
    }

    println!();
    if let Some(last) = chat.messages().last() {
        print_message(last, opts);
    }
    Ok(())
}
