//! MediTrack+ - conversational AI diet assistant library
//!
//! This library provides the chat pipeline behind the MediTrack+ CLI:
//! domain gating, resilient completion fetching, dual-format response
//! splitting, and best-effort meal-plan persistence.
//!
//! # Architecture
//!
//! - `gate`: pre-flight keyword filter for incoming queries
//! - `providers`: completion client abstraction, retry engine, OpenRouter
//! - `parser`: splits raw completions into display text and a meal plan
//! - `meal_plan`: the structured meal-plan data model
//! - `backend`: session identity and meal-plan store collaborators
//! - `session`: per-session conversation orchestration
//! - `prompts`: system prompt construction
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line surface
//!
//! # Example
//!
//! ```no_run
//! use meditrack::backend::BackendClient;
//! use meditrack::config::Config;
//! use meditrack::providers::{resolve_api_key, OpenRouterProvider};
//! use meditrack::session::ChatSession;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     let provider =
//!         OpenRouterProvider::new(config.provider.openrouter.clone(), resolve_api_key()?)?;
//!     let backend = BackendClient::new(config.backend.clone())?;
//!     let mut session = ChatSession::new(Arc::new(provider), backend);
//!
//!     let outcome = session.submit("what diet helps with a headache?").await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gate;
pub mod meal_plan;
pub mod parser;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use backend::{BackendClient, PersistOutcome};
pub use config::Config;
pub use error::{MeditrackError, Result};
pub use gate::DomainGate;
pub use meal_plan::{MealEntry, MealPlan};
pub use providers::{Message, Provider};
pub use session::{ChatSession, TurnOutcome};
