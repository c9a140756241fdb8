//! OpenRouter provider implementation
//!
//! Connects to an OpenRouter-compatible chat completions endpoint with a
//! bearer API key. Every call runs under the retry policy: transport
//! errors, non-2xx statuses, and responses missing the expected content
//! field all consume one attempt, with exponential backoff in between.

use crate::config::OpenRouterConfig;
use crate::error::{MeditrackError, Result};
use crate::providers::{Message, Provider, RetryPolicy, Sleeper, TokioSleeper};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the API key, checked before the keyring
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Keyring service name for stored credentials
pub const KEYRING_SERVICE: &str = "meditrack";
/// Keyring entry name for the OpenRouter API key
pub const KEYRING_USER: &str = "openrouter";

/// OpenRouter chat completions provider
///
/// # Examples
///
/// ```no_run
/// use meditrack::config::OpenRouterConfig;
/// use meditrack::providers::{Message, OpenRouterProvider, Provider};
///
/// # async fn example() -> meditrack::error::Result<()> {
/// let provider = OpenRouterProvider::new(OpenRouterConfig::default(), "sk-or-key".into())?;
/// let history = vec![Message::user("What diet helps with a headache?")];
/// let completion = provider.complete("You are a diet assistant", &history).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
    api_key: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

/// Request payload for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

/// Response payload from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterProvider {
    /// Create a provider with the default retry policy and tokio sleeper
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenRouterConfig, api_key: String) -> Result<Self> {
        Self::with_retry(config, api_key, RetryPolicy::default(), Arc::new(TokioSleeper))
    }

    /// Create a provider with an explicit retry policy and sleeper
    ///
    /// Tests use this to substitute a recording sleeper so backoff delays
    /// can be asserted without real waits.
    pub fn with_retry(
        config: OpenRouterConfig,
        api_key: String,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("meditrack/0.1.0")
            .build()
            .map_err(|e| MeditrackError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenRouter provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
            policy,
            sleeper,
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Issue one completion attempt
    ///
    /// Success requires a 2xx status and a body with a non-empty
    /// `choices[0].message.content`; anything else is an attempt failure.
    async fn try_complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MeditrackError::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MeditrackError::Provider(format!(
                "Completion endpoint returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            MeditrackError::Provider(format!("Failed to parse completion response: {}", e))
        })?;

        match body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
        {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(MeditrackError::Provider(
                "Completion response missing message content".to_string(),
            )
            .into()),
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn complete(&self, system_prompt: &str, history: &[Message]) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend_from_slice(history);

        let mut last_error = String::new();
        for attempt in 1..=self.policy.max_attempts {
            match self.try_complete(&messages).await {
                Ok(content) => {
                    tracing::debug!("Completion succeeded on attempt {}", attempt);
                    return Ok(content);
                }
                Err(e) => {
                    tracing::warn!(
                        "Completion attempt {}/{} failed: {}",
                        attempt,
                        self.policy.max_attempts,
                        e
                    );
                    last_error = e.to_string();
                    if self.policy.has_attempts_remaining(attempt) {
                        let delay = self.policy.delay_for(attempt);
                        tracing::debug!("Retrying in {:?}", delay);
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        Err(MeditrackError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            message: last_error,
        }
        .into())
    }
}

/// Resolve the OpenRouter API key
///
/// Checks the `OPENROUTER_API_KEY` environment variable first, then the OS
/// keyring entry written by `meditrack auth`.
///
/// # Errors
///
/// Returns [`MeditrackError::MissingCredentials`] when neither source has
/// a key.
pub fn resolve_api_key() -> Result<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            tracing::debug!("Using OpenRouter API key from environment");
            return Ok(key);
        }
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .map_err(MeditrackError::Keyring)?;
    match entry.get_password() {
        Ok(key) => {
            tracing::debug!("Using OpenRouter API key from keyring");
            Ok(key)
        }
        Err(keyring::Error::NoEntry) => {
            Err(MeditrackError::MissingCredentials("openrouter".to_string()).into())
        }
        Err(e) => Err(MeditrackError::Keyring(e).into()),
    }
}
