//! Speech collaborators: synthesis for replies, capture for voice input.

pub mod capture;
pub mod tts;

pub use capture::{
    is_capture_failure, resolve_input, CommandCapture, SpeechCapture, NOT_RECOGNIZED,
    NOT_SUPPORTED,
};
pub use tts::{language_code, SpeechSynthesizer, TranslateTts, TtsError};
