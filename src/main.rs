use clap::{Parser, Subcommand};
use colored::*;
use anyhow::{bail, Result};

use chat_cli::api::{ChatApi, ChatMode, HistoryEntry};
use chat_cli::app::App;
use chat_cli::config::{Config, DEFAULT_SERVER_URL};
use chat_cli::{handler, tui, ui};

#[derive(Parser)]
#[command(name = "chat")]
#[command(about = "Terminal client for the chat backend")]
struct Cli {
    /// Backend base URL (overrides the configured one)
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (TUI)
    Chat {
        /// Conversation mode: "single" or "multi"
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Ask a one-shot question
    Ask {
        /// Your question
        question: String,
    },
    /// Print the stored conversation history
    History,
    /// Clear the stored conversation history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let server_url = cli
        .server
        .or_else(|| config.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let api = ChatApi::new(&server_url);

    match cli.command {
        Commands::Chat { mode } => {
            let mode = mode
                .as_deref()
                .or(config.mode.as_deref())
                .and_then(ChatMode::from_str)
                .unwrap_or(ChatMode::Single);
            run_chat(api, mode).await
        }
        Commands::Ask { question } => ask_question(&api, &question).await,
        Commands::History => print_history(&api).await,
        Commands::Clear => clear_history(&api).await,
    }
}

async fn run_chat(api: ChatApi, mode: ChatMode) -> Result<()> {
    let mut app = App::new(api, mode);

    // Load the stored transcript before entering the TUI; a failure is
    // logged and the session starts empty.
    match app.api.history().await {
        Ok(entries) => {
            app.session.apply_history(entries);
            app.scroll_to_bottom();
        }
        Err(e) => {
            log::warn!("failed to load history: {}", e);
        }
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    // Restore the terminal before surfacing a loop error, or raw mode and
    // the alternate screen would outlive the process.
    let result = event_loop(&mut app, &mut terminal, &mut events).await;
    tui::restore()?;
    result
}

async fn event_loop(
    app: &mut App,
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event).await?;
        }

        app.poll_pending().await;
    }
    Ok(())
}

/// One-shot query client: validate, send, print one answer card.
async fn ask_question(api: &ChatApi, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("question is empty");
    }

    println!("🤖 Asking: {}\n", question.bold().cyan());

    match api.ask(question).await {
        Ok(answer) => {
            println!("{}", "Answer:".bold().green());
            println!("{}", answer);
            Ok(())
        }
        Err(e) => {
            log::debug!("ask failed: {}", e);
            eprintln!("{}", "Failed to fetch an answer, please retry later.".red());
            std::process::exit(1);
        }
    }
}

async fn print_history(api: &ChatApi) -> Result<()> {
    let entries = api.history().await?;

    if entries.is_empty() {
        println!("{}", "No stored history".dimmed());
        return Ok(());
    }

    for entry in entries {
        match entry {
            HistoryEntry::User { text, timestamp } => {
                println!("{} {}", "You:".bold().cyan(), timestamp.dimmed());
                println!("{}\n", text);
            }
            HistoryEntry::Assistant { text, timestamp } => {
                println!("{} {}", "AI:".bold().yellow(), timestamp.dimmed());
                println!("{}\n", text);
            }
        }
    }

    Ok(())
}

async fn clear_history(api: &ChatApi) -> Result<()> {
    api.clear().await?;
    println!("{}", "History cleared".green());
    Ok(())
}
