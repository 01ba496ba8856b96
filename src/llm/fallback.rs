//! Fallback chat client: wraps any [`ChatClient`] and returns an inline
//! placeholder on error.
//!
//! When the underlying call fails for any reason (`Request`, `Timeout`,
//! `Status`, `Parse`, `EmptyResponse`) [`FallbackChat`] returns the text
//! `"Error: <cause>"` instead of propagating the error, so a tutoring turn
//! always has a reply to show.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::client::{ChatClient, LlmError};
use crate::llm::message::ChatRequest;

/// Placeholder reply shown in place of a failed completion.
pub fn placeholder_reply(err: &LlmError) -> String {
    format!("Error: {err}")
}

// ---------------------------------------------------------------------------
// FallbackChat
// ---------------------------------------------------------------------------

/// A wrapper around a shared [`ChatClient`] that never returns an error.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use parley::config::LlmConfig;
/// use parley::llm::{ApiChatClient, ChatClient, FallbackChat};
///
/// let inner: Arc<dyn ChatClient> = Arc::new(ApiChatClient::from_config(&LlmConfig::default()));
/// let chat = FallbackChat::new(inner);
/// // `chat` now implements ChatClient and always yields some text.
/// ```
pub struct FallbackChat<C: ChatClient + ?Sized> {
    inner: Arc<C>,
}

impl<C: ChatClient + ?Sized> FallbackChat<C> {
    pub fn new(inner: Arc<C>) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped client.
    pub fn inner(&self) -> &Arc<C> {
        &self.inner
    }

    /// Run `request`, returning the reply text together with the error that
    /// replaced it, if any.
    pub async fn complete_or_placeholder(
        &self,
        request: &ChatRequest,
    ) -> (String, Option<LlmError>) {
        match self.inner.complete(request).await {
            Ok(text) => (text, None),
            Err(err) => {
                log::warn!("chat completion failed, using placeholder: {err}");
                (placeholder_reply(&err), Some(err))
            }
        }
    }
}

impl<C: ChatClient + ?Sized> Clone for FallbackChat<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<C: ChatClient + ?Sized> ChatClient for FallbackChat<C> {
    /// This implementation never returns `Err(_)`.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        Ok(self.complete_or_placeholder(request).await.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk(String);

    #[async_trait]
    impl ChatClient for AlwaysOk {
        async fn complete(&self, _req: &ChatRequest) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    enum LlmErrorKind {
        Request,
        Timeout,
        Parse,
        Empty,
    }

    struct AlwaysFails(LlmErrorKind);

    #[async_trait]
    impl ChatClient for AlwaysFails {
        async fn complete(&self, _req: &ChatRequest) -> Result<String, LlmError> {
            let err = match self.0 {
                LlmErrorKind::Request => LlmError::Request("connection refused".into()),
                LlmErrorKind::Timeout => LlmError::Timeout,
                LlmErrorKind::Parse => LlmError::Parse("bad json".into()),
                LlmErrorKind::Empty => LlmError::EmptyResponse,
            };
            Err(err)
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let chat = FallbackChat::new(Arc::new(AlwaysOk("¡Hola!".into())));
        let (text, err) = chat.complete_or_placeholder(&ChatRequest::user("hi")).await;
        assert_eq!(text, "¡Hola!");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn request_error_becomes_placeholder() {
        let chat = FallbackChat::new(Arc::new(AlwaysFails(LlmErrorKind::Request)));
        let (text, err) = chat.complete_or_placeholder(&ChatRequest::user("hi")).await;
        assert_eq!(text, "Error: HTTP request failed: connection refused");
        assert!(matches!(err, Some(LlmError::Request(_))));
    }

    #[tokio::test]
    async fn every_failure_kind_yields_error_prefix() {
        for kind in [
            LlmErrorKind::Request,
            LlmErrorKind::Timeout,
            LlmErrorKind::Parse,
            LlmErrorKind::Empty,
        ] {
            let chat = FallbackChat::new(Arc::new(AlwaysFails(kind)));
            let text = chat.complete(&ChatRequest::user("hi")).await.unwrap();
            assert!(text.starts_with("Error: "), "got {text}");
        }
    }

    #[tokio::test]
    async fn wraps_trait_objects() {
        let inner: Arc<dyn ChatClient> = Arc::new(AlwaysFails(LlmErrorKind::Timeout));
        let chat = FallbackChat::new(inner);
        assert_eq!(
            chat.complete(&ChatRequest::user("hi")).await.unwrap(),
            "Error: chat request timed out"
        );
    }

    #[test]
    fn fallback_is_object_safe() {
        let _: Box<dyn ChatClient> = Box::new(FallbackChat::new(Arc::new(AlwaysOk("ok".into()))));
    }
}
