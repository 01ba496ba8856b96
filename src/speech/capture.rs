//! Voice input, an alternative to typed text.
//!
//! A [`SpeechCapture`] returns either the transcribed utterance or one of
//! the failure sentinels below. [`resolve_input`] then picks between the
//! voice result and whatever the user typed.

use async_trait::async_trait;
use tokio::process::Command;

/// Returned when no speech recogniser is available.
pub const NOT_SUPPORTED: &str = "SpeechRecognition not supported";

/// Returned when the recogniser ran but produced nothing usable.
pub const NOT_RECOGNIZED: &str = "Could not recognize speech";

/// The speech-capture collaborator.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Listen once and return the utterance or a failure sentinel.
    async fn capture(&self) -> String;
}

/// `true` when `result` is one of the capture failure sentinels.
pub fn is_capture_failure(result: &str) -> bool {
    result.contains("not supported") || result == NOT_RECOGNIZED
}

/// Use the voice result when it holds a real utterance, else the typed text.
pub fn resolve_input(voice: Option<&str>, typed: &str) -> String {
    match voice {
        Some(v) if !v.trim().is_empty() && !is_capture_failure(v) => v.to_string(),
        _ => typed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CommandCapture
// ---------------------------------------------------------------------------

/// Runs an external speech-to-text program and reads the utterance from its
/// stdout (e.g. `termux-speech-to-text`, or a whisper.cpp wrapper script).
pub struct CommandCapture {
    program: Option<String>,
    args: Vec<String>,
}

impl CommandCapture {
    /// Build from `[program, args…]`; an empty list yields a capture that
    /// always reports [`NOT_SUPPORTED`].
    pub fn new(command: &[String]) -> Self {
        let mut parts = command.iter().cloned();
        Self {
            program: parts.next().filter(|p| !p.trim().is_empty()),
            args: parts.collect(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

#[async_trait]
impl SpeechCapture for CommandCapture {
    async fn capture(&self) -> String {
        let Some(program) = &self.program else {
            return NOT_SUPPORTED.to_string();
        };

        match Command::new(program).args(&self.args).output().await {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if text.is_empty() {
                    NOT_RECOGNIZED.to_string()
                } else {
                    text
                }
            }
            Ok(output) => {
                log::warn!("speech capture exited with {}", output.status);
                NOT_RECOGNIZED.to_string()
            }
            Err(e) => {
                log::warn!("speech capture could not start `{program}`: {e}");
                NOT_SUPPORTED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_wins_when_recognised() {
        assert_eq!(resolve_input(Some("hola amigo"), "typed"), "hola amigo");
    }

    #[test]
    fn typed_text_used_on_failure_sentinels() {
        assert_eq!(resolve_input(Some(NOT_SUPPORTED), "typed"), "typed");
        assert_eq!(resolve_input(Some(NOT_RECOGNIZED), "typed"), "typed");
        assert_eq!(resolve_input(Some("   "), "typed"), "typed");
        assert_eq!(resolve_input(None, "typed"), "typed");
    }

    #[tokio::test]
    async fn empty_command_is_not_supported() {
        let capture = CommandCapture::new(&[]);
        assert!(!capture.is_available());
        assert_eq!(capture.capture().await, NOT_SUPPORTED);
    }

    #[tokio::test]
    async fn missing_program_is_not_supported() {
        let capture = CommandCapture::new(&["parley-definitely-missing-stt".to_string()]);
        assert!(capture.is_available());
        assert_eq!(capture.capture().await, NOT_SUPPORTED);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_of_command_is_the_utterance() {
        let capture = CommandCapture::new(&["echo".to_string(), "  Hola komo estas ".to_string()]);
        assert_eq!(capture.capture().await, "Hola komo estas");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_not_recognised() {
        let capture = CommandCapture::new(&["false".to_string()]);
        assert_eq!(capture.capture().await, NOT_RECOGNIZED);
    }
}
