//! User-facing failure taxonomy.
//!
//! Protocols never abort on these. Each failure is converted at its origin
//! into an [`AppError`] and attached to the protocol outcome as a notice that
//! the front-end prints inline.

use thiserror::Error;

use crate::export::ExportError;
use crate::llm::LlmError;
use crate::speech::TtsError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A chat, speech or export collaborator failed.
    #[error("{0}")]
    Collaborator(String),

    /// The record store could not be opened or written.
    #[error("Database error: {0}")]
    StorageUnavailable(String),

    /// Required input was missing; nothing was sent or stored.
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// `true` for validation warnings, which the front-end shows in a milder
    /// style than failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Collaborator(format!("Chat error: {e}"))
    }
}

impl From<TtsError> for AppError {
    fn from(e: TtsError) -> Self {
        AppError::Collaborator(format!("Voice output error: {e}"))
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::Collaborator(format!("Export error: {e}"))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_right_category() {
        let e: AppError = LlmError::Timeout.into();
        assert!(matches!(e, AppError::Collaborator(_)));
        assert_eq!(e.to_string(), "Chat error: chat request timed out");

        let e: AppError = StoreError::Unavailable("disk full".into()).into();
        assert!(matches!(e, AppError::StorageUnavailable(_)));
        assert_eq!(e.to_string(), "Database error: disk full");

        let e: AppError = TtsError::UnsupportedLanguage("sp".into()).into();
        assert!(e.to_string().starts_with("Voice output error:"));
    }

    #[test]
    fn only_validation_is_a_warning() {
        assert!(AppError::Validation("x".into()).is_warning());
        assert!(!AppError::Collaborator("x".into()).is_warning());
        assert!(!AppError::StorageUnavailable("x".into()).is_warning());
    }
}
