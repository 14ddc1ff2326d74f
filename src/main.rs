//! DeskAide - Desktop Assistant
//!
//! Command-line shell around the DeskAide core: reads commands, dispatches
//! them, and renders the typed replies.

use anyhow::Result;
use clap::Parser;
use deskaide::config::Config;
use deskaide::dispatch::{Dispatcher, Reply};
use deskaide::summary::Summarizer;
use std::io::{BufRead, Write};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Prefer the online summarization service when available
    #[arg(long)]
    online: bool,

    /// Run a single command and exit instead of starting the prompt
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("DeskAide v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let summarizer = Summarizer::new(&config);
    let dispatcher = Dispatcher::new(summarizer, config.max_summary_sentences, args.online);

    if !args.command.is_empty() {
        let line = args.command.join(" ");
        render(dispatcher.handle(&line).await);
        return Ok(());
    }

    info!("Ready - type a command");
    info!("   Try: search <query>, calculate <expr>, summarize <text>, read aloud <text>, exit");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match dispatcher.handle(line).await {
            Reply::Quit => {
                println!("Exiting...");
                break;
            }
            reply => render(reply),
        }
    }

    Ok(())
}

fn render(reply: Reply) {
    match reply {
        Reply::Message(text) => println!("{text}"),
        Reply::OpenUrl { url, note } => {
            open_browser(&url);
            println!("{note}");
        }
        Reply::Speak(text) => {
            // speech synthesis is host glue; fall back to printing
            println!("[speak] {text}");
        }
        Reply::Quit => println!("Exiting..."),
        Reply::NotRecognized => println!(
            "Unrecognized command. Try: search, summarize, read aloud, calculate, open browser, exit"
        ),
    }
}

fn open_browser(url: &str) {
    if let Err(e) = std::process::Command::new("xdg-open").arg(url).spawn() {
        warn!("Could not open browser: {}", e);
        println!("  {url}");
    }
}
