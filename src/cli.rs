//! Command-line interface definition for MediTrack+
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat and credential storage.

use clap::{Parser, Subcommand};

/// MediTrack+ - conversational AI diet assistant
///
/// Ask health and diet questions in an interactive chat; structured meal
/// plans embedded in the answers are captured to your MediTrack dashboard.
#[derive(Parser, Debug, Clone)]
#[command(name = "meditrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for MediTrack+
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the configured completion model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Store the OpenRouter API key in the OS keyring
    Auth {
        /// API key to store; prompted for interactively when omitted
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["meditrack", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { model: None }));
        assert_eq!(cli.config, "config/config.yaml");
    }

    #[test]
    fn test_cli_parse_chat_with_model() {
        let cli = Cli::try_parse_from(["meditrack", "chat", "--model", "openai/gpt-4o-mini"])
            .unwrap();
        if let Commands::Chat { model } = cli.command {
            assert_eq!(model.as_deref(), Some("openai/gpt-4o-mini"));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_auth_with_key() {
        let cli = Cli::try_parse_from(["meditrack", "auth", "--api-key", "sk-or-test"]).unwrap();
        if let Commands::Auth { api_key } = cli.command {
            assert_eq!(api_key.as_deref(), Some("sk-or-test"));
        } else {
            panic!("Expected Auth command");
        }
    }

    #[test]
    fn test_cli_parse_custom_config_path() {
        let cli =
            Cli::try_parse_from(["meditrack", "--config", "/tmp/custom.yaml", "chat"]).unwrap();
        assert_eq!(cli.config, "/tmp/custom.yaml");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["meditrack"]).is_err());
    }
}
