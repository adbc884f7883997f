use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::dispatch::{DispatchOutcome, Dispatcher, ProviderChoice};
use crate::document::{read_document, UploadedDocument};
use crate::prompt;

/// Session state behind the REPL and the one-shot CLI flags: the loaded
/// document, the selected backend, and the dispatcher holding both
/// providers. Document text is re-extracted on every action.
pub struct CommandHandler {
    dispatcher: Dispatcher,
    choice: ProviderChoice,
    document: Option<UploadedDocument>,
}

impl CommandHandler {
    pub fn new(dispatcher: Dispatcher, choice: ProviderChoice) -> Self {
        Self {
            dispatcher,
            choice,
            document: None,
        }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        // Handle single-word commands first
        match input.to_lowercase().as_str() {
            "help" => return self.print_help(),
            "status" => return self.print_status(),
            "unload" => return self.unload_document(),
            "abbrev" | "abbreviations" => return self.handle_abbreviations().await,
            _ => {}
        }

        // Handle command prefixes
        if let Some(path) = input.strip_prefix("load ") {
            return self.load_document(path.trim());
        }
        if let Some(name) = input.strip_prefix("use ") {
            return self.switch_provider(name.trim());
        }
        if let Some(question) = input.strip_prefix("ask ") {
            return self.handle_question(question.trim()).await;
        }

        // Bare text is treated as a question, matching a single text box
        self.handle_question(input).await
    }

    pub fn load_document(&mut self, path: &str) -> Result<(), String> {
        if path.is_empty() {
            return Err("Usage: load <path>".to_string());
        }
        let document = UploadedDocument::from_path(path).map_err(|e| format!("{:#}", e))?;
        match document.format() {
            Some(format) => println!(
                "📄 Loaded {} ({:?}, {} bytes)",
                document.filename.bright_yellow(),
                format,
                document.bytes.len()
            ),
            None => println!(
                "{}",
                "⚠️  Unrecognized extension; this document will read as empty text".yellow()
            ),
        }
        self.document = Some(document);
        Ok(())
    }

    fn unload_document(&mut self) -> Result<(), String> {
        match self.document.take() {
            Some(document) => println!("📄 Unloaded {}", document.filename.bright_yellow()),
            None => println!("No document loaded."),
        }
        Ok(())
    }

    fn switch_provider(&mut self, name: &str) -> Result<(), String> {
        match ProviderChoice::parse(name) {
            Some(choice) => {
                self.choice = choice;
                println!("🔄 Switched to {}", self.provider_label().cyan());
                Ok(())
            }
            None => Err(format!(
                "Unknown provider: {}. Available providers: ollama, gemini",
                name
            )),
        }
    }

    async fn handle_question(&mut self, question: &str) -> Result<(), String> {
        if question.is_empty() {
            return Err("Usage: ask <question>".to_string());
        }
        let context = read_document(self.document.as_ref());
        let prompt = prompt::question_prompt(&context, question);
        let outcome = self.dispatch(&prompt).await?;
        self.print_outcome(&outcome);
        Ok(())
    }

    async fn handle_abbreviations(&mut self) -> Result<(), String> {
        let document = match &self.document {
            Some(document) => document,
            None => return Err("No document loaded. Use: load <path>".to_string()),
        };
        let context = read_document(Some(document));
        let prompt = prompt::abbreviation_prompt(&context);
        let outcome = self.dispatch(&prompt).await?;
        self.print_outcome(&outcome);
        Ok(())
    }

    async fn dispatch(&self, prompt: &str) -> Result<DispatchOutcome, String> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Waiting for the model...");

        let result = self.dispatcher.dispatch(self.choice, prompt).await;
        spinner.finish_and_clear();

        result.map_err(|e| format!("Failed to get answer: {}", e))
    }

    fn print_outcome(&self, outcome: &DispatchOutcome) {
        if let Some(warning) = &outcome.warning {
            println!("⚠️  {}", warning.yellow());
        }
        println!("{}", outcome.answer.truecolor(255, 236, 179));
        println!("\n🤖 Answered by {}", outcome.served_by.cyan());
        println!();
    }

    fn provider_label(&self) -> String {
        match self.choice {
            ProviderChoice::Local => format!(
                "Ollama ({})",
                self.dispatcher
                    .local_model()
                    .unwrap_or_else(|| "unavailable".to_string())
            ),
            ProviderChoice::Remote => format!("Gemini ({})", self.dispatcher.remote_model()),
        }
    }

    fn print_status(&self) -> Result<(), String> {
        println!("\n🤖 Backend: {}", self.provider_label().cyan());
        let local_status = if self.dispatcher.local_available() {
            "✅ Ready".green()
        } else {
            "❌ Unavailable (local requests fall back to Gemini)".red()
        };
        println!("  Ollama: {}", local_status);
        match &self.document {
            Some(document) => println!(
                "📄 Document: {} ({} bytes)",
                document.filename.bright_yellow(),
                document.bytes.len()
            ),
            None => println!("📄 Document: none"),
        }
        println!();
        Ok(())
    }

    fn print_help(&self) -> Result<(), String> {
        println!("📚 Commands:");
        println!("  load <path>          - Load a document (pdf, docx, txt, html)");
        println!("  unload               - Drop the loaded document");
        println!("  use <ollama|gemini>  - Switch backend");
        println!("  ask <question>       - Answer a question (bare text works too)");
        println!("  abbrev               - Extract the abbreviation index");
        println!("  status               - Show session state");
        println!("  help                 - Show this menu");
        println!("  exit                 - Quit");
        Ok(())
    }
}
