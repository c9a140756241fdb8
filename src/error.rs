//! Error types for MediTrack+
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for MediTrack+ operations
///
/// Covers configuration loading, completion provider failures, backend
/// collaborator failures, and session state violations. Transient provider
/// failures are contained inside the retry loop and only surface as
/// [`MeditrackError::RetriesExhausted`] once the attempt budget is spent.
#[derive(Error, Debug)]
pub enum MeditrackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion provider errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// All completion attempts failed
    #[error("Completion failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// How many attempts were made before giving up
        attempts: u32,
        /// Description of the last failure
        message: String,
    },

    /// A turn was submitted while another turn is still in flight
    #[error("A turn is already in flight for this session")]
    SessionBusy,

    /// Missing credentials for the completion provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Backend collaborator errors (identity or meal-plan store)
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for MediTrack+ operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
