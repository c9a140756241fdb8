//! Configuration management for MediTrack+
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with environment-variable overrides.

use crate::error::{MeditrackError, Result};
use crate::providers::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the backend session cookie
pub const SESSION_COOKIE_ENV: &str = "MEDITRACK_SESSION_COOKIE";

/// Main configuration structure for MediTrack+
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Web backend collaborator settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Retry budget for completion attempts
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Provider configuration
///
/// Specifies which completion provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// OpenRouter configuration
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

fn default_provider_type() -> String {
    "openrouter".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

/// OpenRouter provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Base URL of the chat completions API
    #[serde(default = "default_openrouter_api_base")]
    pub api_base: String,

    /// Model identifier sent with every request
    #[serde(default = "default_openrouter_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_openrouter_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openrouter_model() -> String {
    "anthropic/claude-3-haiku".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_base: default_openrouter_api_base(),
            model: default_openrouter_model(),
            temperature: default_temperature(),
        }
    }
}

/// Web backend configuration (identity and meal-plan store)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the MediTrack web backend
    #[serde(default = "default_backend_api_base")]
    pub api_base: String,

    /// Session cookie sent with backend requests, e.g. "token=..."
    ///
    /// Overridable via `MEDITRACK_SESSION_COOKIE`.
    #[serde(default)]
    pub session_cookie: Option<String>,

    /// Display name used when the identity endpoint is unavailable
    #[serde(default = "default_display_name")]
    pub default_name: String,
}

fn default_backend_api_base() -> String {
    "http://localhost:5000".to_string()
}

fn default_display_name() -> String {
    "User".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: default_backend_api_base(),
            session_cookie: None,
            default_name: default_display_name(),
        }
    }
}

/// Retry budget configuration for completion attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds (doubles per retry)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Exclusive upper bound of the random jitter, in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_jitter_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetryConfig {
    /// Convert to the runtime retry policy
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.jitter_ms),
        )
    }
}

impl Config {
    /// Load configuration from a YAML file with env overrides applied
    ///
    /// A missing file is not an error: defaults are used so the CLI works
    /// out of the box against the public endpoints.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::info!("Config file {} not found, using defaults", path);
            Self::default()
        };

        if let Ok(cookie) = std::env::var(SESSION_COOKIE_ENV) {
            if !cookie.trim().is_empty() {
                config.backend.session_cookie = Some(cookie);
            }
        }

        Ok(config)
    }

    /// Validate the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`MeditrackError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "openrouter" {
            return Err(MeditrackError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }
        if self.provider.openrouter.model.trim().is_empty() {
            return Err(MeditrackError::Config("Provider model must not be empty".into()).into());
        }
        if !self.provider.openrouter.api_base.starts_with("http") {
            return Err(MeditrackError::Config(format!(
                "Provider api_base must be an HTTP(S) URL, got: {}",
                self.provider.openrouter.api_base
            ))
            .into());
        }
        if !self.backend.api_base.starts_with("http") {
            return Err(MeditrackError::Config(format!(
                "Backend api_base must be an HTTP(S) URL, got: {}",
                self.backend.api_base
            ))
            .into());
        }
        if self.retry.max_attempts == 0 {
            return Err(
                MeditrackError::Config("retry.max_attempts must be at least 1".into()).into(),
            );
        }
        Ok(())
    }
}
