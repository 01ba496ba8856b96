//! Chat-completion collaborator for parley.
//!
//! This module provides:
//! * [`ChatClient`]: async trait implemented by all chat backends.
//! * [`ApiChatClient`]: OpenAI-compatible REST API client.
//! * [`FallbackChat`]: wraps any client; returns an `"Error: …"` placeholder
//!   on failure.
//! * [`ChatMessage`] / [`ChatRequest`]: role-tagged request types.
//! * [`LanguagePair`] / [`arbitration_chat`]: prompt builders.
//! * [`LlmError`]: error variants for chat operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parley::config::AppConfig;
//! use parley::llm::{ApiChatClient, ChatClient, ChatRequest, FallbackChat};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client: Arc<dyn ChatClient> = Arc::new(ApiChatClient::from_config(&config.llm));
//!     let chat = FallbackChat::new(client);
//!
//!     let reply = chat.complete(&ChatRequest::user("Hola")).await.unwrap();
//!     println!("{reply}");
//! }
//! ```

pub mod client;
pub mod fallback;
pub mod message;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiChatClient, ChatClient, LlmError};
pub use fallback::{placeholder_reply, FallbackChat};
pub use message::{ChatMessage, ChatRequest, ChatRole};
pub use prompt::{arbitration_chat, LanguagePair, NO_MISTAKES_REPLY, NO_MISTAKES_SENTINEL};
