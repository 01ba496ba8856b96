//! Role-tagged chat messages and the request sent to a [`ChatClient`].
//!
//! [`ChatClient`]: crate::llm::ChatClient

use serde::{Deserialize, Serialize};

/// Author of a chat message, serialised in OpenAI wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One instruction/content pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single chat-completion request.
///
/// `temperature` and `model` fall back to the client's configured values
/// when left unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            model: None,
        }
    }

    /// Request with a single user message.
    pub fn user(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialise_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be fair")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be fair");

        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn user_request_has_single_message_and_no_overrides() {
        let req = ChatRequest::user("hola");
        assert_eq!(req.messages, vec![ChatMessage::user("hola")]);
        assert!(req.temperature.is_none());
        assert!(req.model.is_none());
    }

    #[test]
    fn overrides_are_kept() {
        let req = ChatRequest::user("x")
            .with_temperature(Some(0.9))
            .with_model("mixtral");
        assert_eq!(req.temperature, Some(0.9));
        assert_eq!(req.model.as_deref(), Some("mixtral"));
    }
}
