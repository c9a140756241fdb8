//! Backend collaborators: session identity and meal-plan store
//!
//! The web backend provides two cookie-authenticated endpoints the pipeline
//! talks to: `GET /api/me` for the signed-in user's display name, and
//! `POST /api/mealPlans/create` for durable meal-plan persistence. Both are
//! side channels of the chat interaction, so neither is ever allowed to
//! fail a turn: the identity lookup degrades to a default name and
//! persistence reports a soft outcome instead of an error.

use crate::config::BackendConfig;
use crate::error::{MeditrackError, Result};
use crate::meal_plan::MealPlan;

use reqwest::header;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Outcome of a fire-and-forget persistence call
///
/// At-most-once: a `Failed` outcome is logged and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The store acknowledged the plan with a 2xx response
    Saved,
    /// Transport error or non-2xx response; the plan is dropped
    Failed,
}

/// Response body from the current-user endpoint
#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// HTTP client for the MediTrack web backend
///
/// # Examples
///
/// ```no_run
/// use meditrack::backend::BackendClient;
/// use meditrack::config::BackendConfig;
///
/// # async fn example() -> meditrack::error::Result<()> {
/// let backend = BackendClient::new(BackendConfig::default())?;
/// let name = backend.display_name().await;
/// assert!(!name.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("meditrack/0.1.0")
            .build()
            .map_err(|e| MeditrackError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Attach the session cookie, when one is configured
    fn with_session(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.session_cookie {
            Some(cookie) if !cookie.is_empty() => request.header(header::COOKIE, cookie),
            _ => request,
        }
    }

    /// Fetch the signed-in user's display name
    ///
    /// Never fails: any transport error, non-2xx status, or body without a
    /// usable name falls back to the configured default name.
    pub async fn display_name(&self) -> String {
        match self.fetch_display_name().await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch display name, using \"{}\": {}",
                    self.config.default_name,
                    e
                );
                self.config.default_name.clone()
            }
        }
    }

    async fn fetch_display_name(&self) -> Result<String> {
        let response = self
            .with_session(self.client.get(self.url("/api/me")))
            .send()
            .await
            .map_err(|e| MeditrackError::Backend(format!("Identity request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                MeditrackError::Backend(format!("Identity endpoint returned {}", status)).into(),
            );
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            MeditrackError::Backend(format!("Failed to parse identity response: {}", e))
        })?;

        user.username
            .or(user.name)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                MeditrackError::Backend("Identity response carried no name".to_string()).into()
            })
    }

    /// Forward a meal plan to the store, best effort
    ///
    /// Precondition: the plan parsed cleanly and has at least one entry.
    /// Failures are logged and reported as [`PersistOutcome::Failed`];
    /// there is no retry and nothing is surfaced to the chat transcript.
    pub async fn persist_meal_plan(&self, plan: &MealPlan) -> PersistOutcome {
        let result = self
            .with_session(self.client.post(self.url("/api/mealPlans/create")))
            .json(plan)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Saved meal plan with {} entries", plan.meals.len());
                PersistOutcome::Saved
            }
            Ok(response) => {
                tracing::warn!(
                    "Meal-plan store rejected the plan with status {}",
                    response.status()
                );
                PersistOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Meal-plan store unreachable: {}", e);
                PersistOutcome::Failed
            }
        }
    }
}
