//! Speech synthesis for assistant replies.
//!
//! [`TranslateTts`] speaks through the public translate-TTS endpoint: text is
//! split into chunks of at most [`MAX_CHUNK_CHARS`] characters on word
//! boundaries, each chunk is fetched as MP3, and the frames are concatenated
//! into one playable stream.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SpeechConfig;

/// Longest text the endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Two-letter codes the endpoint can voice.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "eo", "es", "et",
    "fi", "fr", "gu", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "jw", "km", "kn", "ko",
    "la", "lv", "mk", "ml", "mr", "my", "ne", "nl", "no", "pl", "pt", "ro", "ru", "si", "sk",
    "sq", "sr", "su", "sv", "sw", "ta", "te", "th", "tl", "tr", "uk", "ur", "vi", "zh",
];

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("nothing to speak")]
    EmptyText,

    #[error("TTS request failed: {0}")]
    Request(String),

    #[error("TTS request timed out")]
    Timeout,

    #[error("TTS endpoint returned HTTP {0}")]
    Status(u16),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

/// Two-letter code derived from a language name: its first two characters,
/// lower-cased (`"English"` → `"en"`, `"es"` → `"es"`).
pub fn language_code(language: &str) -> String {
    language.trim().chars().take(2).collect::<String>().to_lowercase()
}

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// The speech-synthesis collaborator: text plus two-letter code in, MP3 out.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, TtsError>;
}

// ---------------------------------------------------------------------------
// TranslateTts
// ---------------------------------------------------------------------------

pub struct TranslateTts {
    client: reqwest::Client,
    base_url: String,
}

impl TranslateTts {
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.tts_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, TtsError> {
        if !is_supported_language(language_code) {
            return Err(TtsError::UnsupportedLanguage(language_code.to_string()));
        }

        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let url = format!("{}/translate_tts", self.base_url);
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language_code),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(TtsError::Status(status.as_u16()));
            }
            audio.extend_from_slice(&response.bytes().await?);
        }

        log::debug!(
            "tts: synthesized {} chunk(s), {} bytes ({language_code})",
            chunks.len(),
            audio.len()
        );
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tts_for(server: &MockServer) -> TranslateTts {
        TranslateTts::from_config(&SpeechConfig {
            enabled: true,
            tts_base_url: server.uri(),
            timeout_secs: 5,
            capture_command: Vec::new(),
        })
    }

    #[test]
    fn language_code_takes_first_two_letters() {
        assert_eq!(language_code("English"), "en");
        assert_eq!(language_code("Spanish"), "sp");
        assert_eq!(language_code(" es "), "es");
        assert_eq!(language_code("F"), "f");
    }

    #[test]
    fn supported_language_lookup() {
        assert!(is_supported_language("en"));
        assert!(is_supported_language("es"));
        assert!(!is_supported_language("sp"));
        assert!(!is_supported_language(""));
    }

    #[test]
    fn chunks_never_exceed_limit() {
        let text = "palabra ".repeat(60);
        let chunks = split_into_chunks(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
        assert_eq!(chunks.join(" "), text.trim());
    }

    #[test]
    fn oversized_word_is_split_hard() {
        let word = "x".repeat(250);
        let chunks = split_into_chunks(&format!("hi {word} bye"), MAX_CHUNK_CHARS);
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], "hi");
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[3].len(), 50);
        assert_eq!(chunks[4], "bye");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "ñ".repeat(100);
        assert_eq!(split_into_chunks(&text, MAX_CHUNK_CHARS).len(), 1);
    }

    #[test]
    fn whitespace_only_text_has_no_chunks() {
        assert!(split_into_chunks("   \n ", MAX_CHUNK_CHARS).is_empty());
    }

    #[tokio::test]
    async fn unsupported_language_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = tts_for(&server).synthesize("Hola", "sp").await.unwrap_err();
        assert!(matches!(err, TtsError::UnsupportedLanguage(code) if code == "sp"));
    }

    #[tokio::test]
    async fn concatenates_audio_of_every_chunk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "es"))
            .and(query_param("client", "tw-ob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MP3".to_vec()))
            .expect(2)
            .mount(&server)
            .await;

        let text = "hola ".repeat(30);
        let audio = tts_for(&server).synthesize(&text, "es").await.unwrap();
        assert_eq!(audio, b"MP3MP3".to_vec());
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = tts_for(&server).synthesize("hello", "en").await.unwrap_err();
        assert!(matches!(err, TtsError::Status(429)));
    }
}
