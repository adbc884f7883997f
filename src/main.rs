use rust_doc_qa::commands::CommandHandler;
use rust_doc_qa::dispatch::{Dispatcher, ProviderChoice};
use rust_doc_qa::providers::gemini::gemini::GeminiProvider;
use rust_doc_qa::providers::ollama::ollama::OllamaProvider;
use rust_doc_qa::providers::traits::CompletionProvider;

use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to load before the first action
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Backend to use: ollama or gemini
    #[arg(long, default_value = "ollama")]
    provider: String,

    /// Gemini API key (falls back to the GEMINI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Ask one question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Extract the abbreviation index and exit
    #[arg(long)]
    abbreviations: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize colored output
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let choice = ProviderChoice::parse(&args.provider)
        .ok_or_else(|| format!("Unknown provider: {} (expected ollama or gemini)", args.provider))?;

    // The key may legitimately be absent when only Ollama is used, but the
    // remote backend then fails on first contact.
    let api_key = args
        .api_key
        .clone()
        .or_else(|| env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("GEMINI_API_KEY is not set; remote backend calls will fail");
    }

    // Local backend init is best-effort and decided once per session.
    let local: Option<Box<dyn CompletionProvider + Send + Sync>> =
        match OllamaProvider::new().await {
            Ok(provider) => Some(Box::new(provider)),
            Err(e) => {
                log::warn!("Ollama backend unavailable: {}", e);
                None
            }
        };
    let remote = Box::new(GeminiProvider::new(api_key));

    let dispatcher = Dispatcher::new(local, remote);
    let mut handler = CommandHandler::new(dispatcher, choice);

    if let Some(path) = &args.file {
        handler.load_document(&path.to_string_lossy())?;
    }

    // Scripting mode: run the requested actions and exit.
    if args.abbreviations || args.question.is_some() {
        if args.abbreviations {
            handler.handle_command("abbrev").await?;
        }
        if let Some(question) = &args.question {
            handler.handle_command(&format!("ask {}", question)).await?;
        }
        return Ok(());
    }

    // Show initial help menu
    handler.handle_command("help").await?;

    // Main input loop
    let mut rl = Editor::<(), DefaultHistory>::new()?;
    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                    break;
                }
                let _ = rl.add_history_entry(input);

                if let Err(e) = handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
