//! Interactive chat session handler
//!
//! Instantiates the provider and backend client, creates a [`ChatSession`],
//! and runs a readline-based loop that submits user input to the session
//! and renders each turn outcome.

use crate::backend::{BackendClient, PersistOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::providers::{resolve_api_key, OpenRouterProvider, TokioSleeper};
use crate::session::{ChatSession, TurnOutcome};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Start an interactive chat session
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `model_override` - Optional override for the configured model
pub async fn run_chat(mut config: Config, model_override: Option<String>) -> Result<()> {
    if let Some(model) = model_override {
        tracing::debug!("Using model override: {}", model);
        config.provider.openrouter.model = model;
    }

    let api_key = resolve_api_key()?;
    let provider = OpenRouterProvider::with_retry(
        config.provider.openrouter.clone(),
        api_key,
        config.retry.policy(),
        Arc::new(TokioSleeper),
    )?;
    let backend = BackendClient::new(config.backend.clone())?;
    let mut session = ChatSession::new(Arc::new(provider), backend);

    let mut rl = DefaultEditor::new()?;
    print_welcome_banner(&config.provider.openrouter.model);

    loop {
        match rl.readline(&format!("{} ", "you>".cyan().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if matches!(trimmed, "exit" | "quit") {
                    break;
                }
                rl.add_history_entry(trimmed)?;

                // Typing indicator for the whole request/retry period.
                println!("{}", "MediTrack+ is thinking...".dimmed());

                match session.submit(trimmed).await {
                    Ok(outcome) => render_outcome(&outcome),
                    Err(e) => {
                        tracing::error!("Turn failed: {}", e);
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Take care! 👋");
    Ok(())
}

fn print_welcome_banner(model: &str) {
    println!("{}", "MediTrack+ AI diet assistant".green().bold());
    println!("model: {}", model.cyan());
    println!("Ask about health, diet, or wellness. Type 'exit' to quit.\n");
}

fn render_outcome(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Rejected { message } => {
            println!("{} {}\n", "MediTrack+:".yellow().bold(), message);
        }
        TurnOutcome::Answered {
            display,
            plan_outcome,
        } => {
            println!("{}\n{}\n", "MediTrack+:".green().bold(), display);
            match plan_outcome {
                Some(PersistOutcome::Saved) => {
                    println!("{}\n", "Meal plan saved to your dashboard.".dimmed());
                }
                Some(PersistOutcome::Failed) => {
                    // Soft failure: the answer stands, only the capture is lost.
                    println!(
                        "{}\n",
                        "Meal plan could not be saved this time.".yellow().dimmed()
                    );
                }
                None => {}
            }
        }
        TurnOutcome::Failed { apology } => {
            println!("{} {}\n", "MediTrack+:".red().bold(), apology);
        }
    }
}
