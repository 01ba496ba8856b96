//! Conversation session state.

pub mod transcript;

pub use transcript::{ConversationTurn, Transcript, TurnRole};
