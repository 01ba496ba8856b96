//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides [`LlmConfig::api_key`].
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Learner proficiency, embedded verbatim in the tutoring prompt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// TutorMode
// ---------------------------------------------------------------------------

/// Selects which reply prompt the tutoring turn sends.
///
/// | Variant      | Reply                                   |
/// |--------------|-----------------------------------------|
/// | Conversation | Tutor keeps chatting in target language |
/// | Translation  | Natural translation known → target      |
///
/// Both variants run the same correction check afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum TutorMode {
    #[default]
    Conversation,
    Translation,
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completion collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API; `/v1/chat/completions` is
    /// appended.
    ///
    /// - Groq default: `https://api.groq.com/openai`
    /// - Ollama: `http://localhost:11434`
    pub base_url: String,
    /// API key. `None` for local providers. Overridden by `GROQ_API_KEY`.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Default sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a chat response.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".into(),
            api_key: None,
            model: "llama3-8b-8192".into(),
            temperature: 0.5,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// TutorConfig
// ---------------------------------------------------------------------------

/// Defaults for tutoring and translation sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Language the learner already speaks; corrections are written in it.
    pub known_language: String,
    /// Language being practised.
    pub target_language: String,
    pub level: Level,
    pub mode: TutorMode,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            known_language: "English".into(),
            target_language: "Spanish".into(),
            level: Level::default(),
            mode: TutorMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// JudgeConfig
// ---------------------------------------------------------------------------

/// Settings for arbitration requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Sampling temperature used for verdicts; `None` uses `llm.temperature`.
    pub temperature: Option<f32>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for spoken replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Synthesize audio for every assistant reply.
    pub enabled: bool,
    /// Base URL of the translate-TTS endpoint.
    pub tts_base_url: String,
    /// Maximum seconds to wait for each audio chunk.
    pub timeout_secs: u64,
    /// External speech-to-text command (program followed by arguments) whose
    /// stdout is the transcribed utterance. Empty disables voice input.
    #[serde(default)]
    pub capture_command: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tts_base_url: "https://translate.google.com".into(),
            timeout_secs: 15,
            capture_command: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig / ExportConfig
// ---------------------------------------------------------------------------

/// Location of the record database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit database path; `None` uses [`AppPaths::records_db`].
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| AppPaths::new().records_db)
    }
}

/// Where exported documents and audio files are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Explicit output directory; `None` uses [`AppPaths::exports_dir`].
    pub output_dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().exports_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Every section is optional in the file; missing sections take their
/// defaults.
///
/// ```rust,no_run
/// use parley::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(!config.llm.model.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub tutor: TutorConfig,
    pub judge: JudgeConfig,
    pub speech: SpeechConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`, then
    /// apply the `GROQ_API_KEY` override.
    ///
    /// Returns the defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&AppPaths::new().settings_file)?;
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the configured API key with `value` when it is non-empty.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
