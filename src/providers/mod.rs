//! Completion provider abstraction
//!
//! This module defines the [`Provider`] trait, the conversation
//! [`Message`] type, the retry machinery, and the OpenRouter
//! implementation used in production.

pub mod base;
pub mod openrouter;
pub mod retry;

pub use base::{Message, Provider};
pub use openrouter::{resolve_api_key, OpenRouterProvider};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
