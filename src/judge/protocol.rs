//! Arbitration: two statements in, one persisted verdict out.

use std::sync::Arc;

use crate::error::AppError;
use crate::llm::{arbitration_chat, ChatClient, ChatMessage, ChatRequest};
use crate::store::{NewVerdict, RecordId, RecordStore};

use super::split::{parse_split, Split};
use super::theme::ConflictTheme;

/// Everything the arbitration form collects.
#[derive(Debug, Clone)]
pub struct ConflictForm {
    pub theme: ConflictTheme,
    pub user1_name: String,
    pub user1_input: String,
    pub user2_name: String,
    pub user2_input: String,
}

impl ConflictForm {
    /// Names of the text fields that are empty after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("user1_name", &self.user1_name),
            ("user1_input", &self.user1_input),
            ("user2_name", &self.user2_name),
            ("user2_input", &self.user2_input),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Result of one arbitration run.
///
/// `verdict` is `None` when the form was incomplete or the chat call failed;
/// the reason is in `notices`.
#[derive(Debug, Default)]
pub struct Ruling {
    pub verdict: Option<String>,
    pub record_id: Option<RecordId>,
    pub split: Option<Split>,
    pub notices: Vec<AppError>,
}

/// Runs the arbitration protocol against a chat client and the record store.
pub struct Arbiter {
    chat: Arc<dyn ChatClient>,
    store: Arc<RecordStore>,
    temperature: Option<f32>,
    model: Option<String>,
}

impl Arbiter {
    pub fn new(chat: Arc<dyn ChatClient>, store: Arc<RecordStore>) -> Self {
        Self {
            chat,
            store,
            temperature: None,
            model: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub async fn arbitrate(&self, form: &ConflictForm) -> Ruling {
        let mut ruling = Ruling::default();

        let missing = form.missing_fields();
        if !missing.is_empty() {
            log::debug!("judge: rejected form, missing {missing:?}");
            ruling.notices.push(AppError::Validation(format!(
                "Please fill in all fields (missing: {}).",
                missing.join(", ")
            )));
            return ruling;
        }

        let user1_name = form.user1_name.trim();
        let user2_name = form.user2_name.trim();
        let user1_input = form.user1_input.trim();
        let user2_input = form.user2_input.trim();

        let (system_msg, user_msg) = arbitration_chat(
            form.theme.label(),
            user1_name,
            user1_input,
            user2_name,
            user2_input,
        );
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(system_msg),
            ChatMessage::user(user_msg),
        ])
        .with_temperature(self.temperature);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let verdict = match self.chat.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("judge: chat failed, nothing persisted: {e}");
                ruling.notices.push(e.into());
                return ruling;
            }
        };

        let record = NewVerdict {
            theme: form.theme.label().to_string(),
            user1_name: user1_name.to_string(),
            user2_name: user2_name.to_string(),
            user1_input: user1_input.to_string(),
            user2_input: user2_input.to_string(),
            verdict: verdict.clone(),
        };
        match self
            .store
            .run_blocking(move |store| store.record_verdict(&record))
            .await
        {
            Ok(id) => ruling.record_id = Some(id),
            Err(e) => {
                log::warn!("judge: could not save verdict: {e}");
                ruling.notices.push(e.into());
            }
        }

        ruling.split = parse_split(&verdict);
        if ruling.split.is_none() {
            log::debug!("judge: no percentage split in verdict");
        }
        ruling.verdict = Some(verdict);
        ruling
    }
}
