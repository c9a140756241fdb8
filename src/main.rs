//! MediTrack+ - conversational AI diet assistant CLI
//!
//! Main entry point: initializes tracing, loads configuration, and
//! dispatches to the selected command.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meditrack::cli::{Cli, Commands};
use meditrack::commands;
use meditrack::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { model } => {
            tracing::info!("Starting interactive chat session");
            commands::chat::run_chat(config, model).await?;
            Ok(())
        }
        Commands::Auth { api_key } => {
            tracing::info!("Storing provider credentials");
            commands::auth::store_api_key(api_key)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "meditrack=debug"
    } else {
        "meditrack=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
