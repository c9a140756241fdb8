//! Credential storage handler
//!
//! Stores the OpenRouter API key in the OS keyring so chat sessions can
//! authenticate without the key living in config files or shell history.

use crate::error::Result;
use crate::providers::openrouter::{KEYRING_SERVICE, KEYRING_USER};

use colored::Colorize;
use rustyline::DefaultEditor;

/// Store the OpenRouter API key in the keyring
///
/// Prompts interactively when no key was passed on the command line.
///
/// # Errors
///
/// Returns error if the prompt is aborted or the keyring is unavailable.
pub fn store_api_key(api_key: Option<String>) -> Result<()> {
    let key = match api_key {
        Some(key) => key,
        None => {
            let mut rl = DefaultEditor::new()?;
            rl.readline("OpenRouter API key: ")?
        }
    };
    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(key)?;

    tracing::info!("Stored OpenRouter API key in keyring");
    println!("{}", "API key stored.".green());
    Ok(())
}
