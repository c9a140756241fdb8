/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat` — Interactive chat session
- `auth` — Store the OpenRouter API key

These handlers are intentionally small and use the library components:
the provider, the backend client, and the chat session.
*/

pub mod auth;
pub mod chat;
