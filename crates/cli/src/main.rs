//! LexChat CLI: the main entry point.
//!
//! Commands:
//! - `chat`     Interactive or single-message chat with the legal backend
//! - `extract`  Run the artifact extractor over a file or stdin
//! - `replay`   Feed a recorded event stream through a session
//! - `agents`   List the backend's agents
//! - `config`   Validate and show configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "lexchat",
    about = "LexChat: streaming chat client for a multi-agent legal assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the legal assistant
    Chat {
        /// Agent to route queries to (e.g. contract_analyzer)
        #[arg(short, long)]
        agent: Option<String>,

        /// Resume an existing session id instead of starting a new one
        #[arg(short, long)]
        session: Option<String>,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Extract artifacts from a response text
    Extract {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Print the raw extraction result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay an NDJSON file of backend events through a session
    Replay {
        file: PathBuf,

        /// Print the resulting messages as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available agents
    Agents,

    /// Validate and print the effective configuration
    Config {
        /// Print the default configuration instead
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            agent,
            session,
            message,
        } => commands::chat::run(agent, session, message).await?,
        Commands::Extract { file, json } => commands::extract::run(file, json)?,
        Commands::Replay { file, json } => commands::replay::run(file, json).await?,
        Commands::Agents => commands::agents::run(),
        Commands::Config { default } => commands::config_cmd::run(default)?,
    }

    Ok(())
}
