//! Per-session conversation orchestration
//!
//! A [`ChatSession`] owns the conversation history and the in-flight flag
//! for one user session and drives each turn through the pipeline:
//! domain gate, completion with retry, response splitting, rendering, and
//! best-effort meal-plan persistence. Exactly one turn may be in flight at
//! a time; history and the flag are only touched from the session's own
//! task, so no locking is required.

use crate::backend::{BackendClient, PersistOutcome};
use crate::error::{MeditrackError, Result};
use crate::gate::DomainGate;
use crate::parser;
use crate::prompts;
use crate::providers::{Message, Provider};

use std::sync::Arc;

/// Canned refusal for out-of-scope queries
pub const REFUSAL_MESSAGE: &str = "⚠️ I'm MediTrack+, a healthcare assistant. I only answer health, diet, and wellness-related queries.";

/// Canned apology shown when every completion attempt failed
///
/// Rendered only; never appended to history, so a failed turn cannot
/// masquerade as model output in later completions.
pub const APOLOGY_MESSAGE: &str =
    "I'm sorry, I couldn't reach the assistant service right now. Please try again in a moment.";

/// Conversation history for one session
///
/// Ordered, replayed verbatim to the completion service. Appends of
/// empty content are refused so the history never carries a blank message.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the conversation
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true when no messages have been recorded
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a user message, ignoring empty content
    pub fn push_user(&mut self, content: &str) {
        self.push(Message::user(content));
    }

    /// Append an assistant message, ignoring empty content
    pub fn push_assistant(&mut self, content: &str) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        if message.content.trim().is_empty() {
            tracing::warn!("Refusing to append empty {} message to history", message.role);
            return;
        }
        self.messages.push(message);
    }
}

/// Result of one submitted turn
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The domain gate declined the query; no network call was made
    Rejected {
        /// Canned refusal to render
        message: String,
    },
    /// The completion succeeded and was split for rendering
    Answered {
        /// Human-readable segment to render
        display: String,
        /// Persistence outcome, when a non-empty meal plan was present
        plan_outcome: Option<PersistOutcome>,
    },
    /// Every completion attempt failed
    Failed {
        /// Canned apology to render (not recorded in history)
        apology: String,
    },
}

/// Orchestrates the chat pipeline for one session
///
/// # Examples
///
/// ```no_run
/// use meditrack::backend::BackendClient;
/// use meditrack::config::Config;
/// use meditrack::providers::{resolve_api_key, OpenRouterProvider};
/// use meditrack::session::ChatSession;
/// use std::sync::Arc;
///
/// # async fn example() -> meditrack::error::Result<()> {
/// let config = Config::default();
/// let provider = OpenRouterProvider::new(config.provider.openrouter.clone(), resolve_api_key()?)?;
/// let backend = BackendClient::new(config.backend.clone())?;
/// let mut session = ChatSession::new(Arc::new(provider), backend);
/// let outcome = session.submit("what diet helps with a headache?").await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatSession {
    gate: DomainGate,
    provider: Arc<dyn Provider>,
    backend: BackendClient,
    history: Conversation,
    in_flight: bool,
}

impl ChatSession {
    /// Create a session with an empty conversation
    pub fn new(provider: Arc<dyn Provider>, backend: BackendClient) -> Self {
        Self {
            gate: DomainGate::new(),
            provider,
            backend,
            history: Conversation::new(),
            in_flight: false,
        }
    }

    /// The conversation recorded so far
    pub fn history(&self) -> &Conversation {
        &self.history
    }

    /// Returns true while a turn is being processed
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submit one user query and drive it through the pipeline
    ///
    /// # Errors
    ///
    /// Returns [`MeditrackError::SessionBusy`] if called while another turn
    /// is still in flight. Completion failures do not surface as errors;
    /// they end the turn with [`TurnOutcome::Failed`].
    pub async fn submit(&mut self, query: &str) -> Result<TurnOutcome> {
        if self.in_flight {
            return Err(MeditrackError::SessionBusy.into());
        }

        let query = query.trim();
        if query.is_empty() {
            // Nothing to gate and nothing that may enter history.
            return Ok(TurnOutcome::Rejected {
                message: REFUSAL_MESSAGE.to_string(),
            });
        }

        self.in_flight = true;
        let outcome = self.run_turn(query).await;
        self.in_flight = false;
        Ok(outcome)
    }

    async fn run_turn(&mut self, query: &str) -> TurnOutcome {
        if !self.gate.accepts(query) {
            tracing::debug!("Domain gate rejected query");
            self.history.push_user(query);
            self.history.push_assistant(REFUSAL_MESSAGE);
            return TurnOutcome::Rejected {
                message: REFUSAL_MESSAGE.to_string(),
            };
        }

        // The user message is recorded before the request is attempted so
        // no failure can leave the conversation inconsistent.
        self.history.push_user(query);

        let display_name = self.backend.display_name().await;
        let system_prompt = prompts::diet_system_prompt(&display_name);

        let raw = match self
            .provider
            .complete(&system_prompt, self.history.messages())
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Completion failed: {}", e);
                return TurnOutcome::Failed {
                    apology: APOLOGY_MESSAGE.to_string(),
                };
            }
        };

        let split = parser::split(&raw);

        // The full raw completion (markers included) goes into history so
        // later turns see exactly what the model produced.
        self.history.push_assistant(&raw);

        let plan_outcome = match &split.plan {
            Some(plan) if !plan.is_empty() => Some(self.backend.persist_meal_plan(plan).await),
            Some(_) => {
                tracing::debug!("Meal plan block was empty, nothing to persist");
                None
            }
            None => None,
        };

        TurnOutcome::Answered {
            display: split.display,
            plan_outcome,
        }
    }
}
