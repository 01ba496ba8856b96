//! Tutoring session: drives one learner turn end to end.
//!
//! # Turn flow
//!
//! ```text
//! utterance (trimmed, non-empty)
//!   └─▶ reply prompt (tutoring | translation) → chat      [placeholder on error]
//!         └─▶ append (User, utterance), (Assistant, reply)
//!         └─▶ voice enabled → synthesize(reply, code)     [notice on error]
//!   └─▶ correction prompt → chat                        [placeholder on error]
//!         ├─ contains "No mistakes" → done
//!         └─ otherwise → spawn_blocking(record_mistake)   [notice on error]
//!                        append (Correction, correction)
//! ```

use std::sync::Arc;

use crate::config::{AppConfig, TutorMode};
use crate::error::AppError;
use crate::llm::{ChatClient, ChatRequest, FallbackChat, LanguagePair, NO_MISTAKES_SENTINEL};
use crate::session::{ConversationTurn, Transcript, TurnRole};
use crate::speech::{language_code, SpeechSynthesizer};
use crate::store::{RecordId, RecordStore};

/// Error type stored with every mistake the tutor logs.
pub const LANGUAGE_MISTAKE: &str = "language mistake";

/// `true` when a correction reply says the sentence was fine.
///
/// This is a case-sensitive substring test: a correction that mentions
/// "No mistakes" anywhere, even while listing mistakes, is treated as clean
/// and nothing is logged.
pub fn is_no_mistakes(correction: &str) -> bool {
    correction.contains(NO_MISTAKES_SENTINEL)
}

/// What one call to [`TutorSession::run_turn`] produced.
#[derive(Debug, Default)]
pub struct TurnOutcome {
    /// Assistant reply, or the `"Error: …"` placeholder.
    pub reply: String,
    /// Correction text when the learner made a mistake.
    pub correction: Option<String>,
    pub mistake_id: Option<RecordId>,
    /// MP3 audio of the reply when voice output is on and succeeded.
    pub audio: Option<Vec<u8>>,
    pub notices: Vec<AppError>,
}

/// One learner's conversation with the tutor.
pub struct TutorSession {
    transcript: Transcript,
    languages: LanguagePair,
    mode: TutorMode,
    chat: FallbackChat<dyn ChatClient>,
    store: Arc<RecordStore>,
    voice: Option<Arc<dyn SpeechSynthesizer>>,
}

impl TutorSession {
    pub fn new(
        languages: LanguagePair,
        mode: TutorMode,
        chat: Arc<dyn ChatClient>,
        store: Arc<RecordStore>,
    ) -> Self {
        Self {
            transcript: Transcript::new(),
            languages,
            mode,
            chat: FallbackChat::new(chat),
            store,
            voice: None,
        }
    }

    /// Build a session from the `[tutor]` section of `config`.
    pub fn from_config(
        config: &AppConfig,
        chat: Arc<dyn ChatClient>,
        store: Arc<RecordStore>,
    ) -> Self {
        let languages = LanguagePair::new(
            config.tutor.known_language.clone(),
            config.tutor.target_language.clone(),
            config.tutor.level,
        );
        Self::new(languages, config.tutor.mode, chat, store)
    }

    /// Speak every reply through `voice`; `None` turns voice output off.
    pub fn set_voice(&mut self, voice: Option<Arc<dyn SpeechSynthesizer>>) {
        self.voice = voice;
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice.is_some()
    }

    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    pub fn mode(&self) -> TutorMode {
        self.mode
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The last `n` turns, for display.
    pub fn recent_turns(&self, n: usize) -> &[ConversationTurn] {
        self.transcript.last_n(n)
    }

    /// Start the conversation over.
    pub fn reset(&mut self) {
        log::debug!("tutor: transcript cleared ({} turns)", self.transcript.len());
        self.transcript.reset();
    }

    /// Run one tutoring turn. Returns `None` for blank input, in which case
    /// nothing is sent, stored or appended.
    pub async fn run_turn(&mut self, utterance: &str) -> Option<TurnOutcome> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return None;
        }

        let mut outcome = TurnOutcome::default();

        let prompt = match self.mode {
            TutorMode::Conversation => self.languages.tutoring_prompt(utterance),
            TutorMode::Translation => self.languages.translation_prompt(utterance),
        };
        let (reply, err) = self
            .chat
            .complete_or_placeholder(&ChatRequest::user(prompt))
            .await;
        if let Some(e) = err {
            outcome.notices.push(e.into());
        }

        self.transcript.append_turn(TurnRole::User, utterance);
        self.transcript.append_turn(TurnRole::Assistant, reply.clone());

        if let Some(voice) = &self.voice {
            let code = language_code(&self.languages.target);
            match voice.synthesize(&reply, &code).await {
                Ok(audio) => outcome.audio = Some(audio),
                Err(e) => {
                    log::warn!("tutor: voice output failed: {e}");
                    outcome.notices.push(e.into());
                }
            }
        }

        let (correction, err) = self
            .chat
            .complete_or_placeholder(&ChatRequest::user(
                self.languages.correction_prompt(utterance),
            ))
            .await;

        // On failure `correction` is the placeholder and is checked like any
        // other reply.
        if let Some(e) = err {
            outcome.notices.push(e.into());
        }

        if !is_no_mistakes(&correction) {
            let user_input = utterance.to_string();
            let corrected = correction.clone();
            match self
                .store
                .run_blocking(move |store| {
                    store.record_mistake(&user_input, &corrected, LANGUAGE_MISTAKE)
                })
                .await
            {
                Ok(id) => outcome.mistake_id = Some(id),
                Err(e) => {
                    log::warn!("tutor: could not log mistake: {e}");
                    outcome.notices.push(e.into());
                }
            }
            self.transcript
                .append_turn(TurnRole::Correction, correction.clone());
            outcome.correction = Some(correction);
        }

        outcome.reply = reply;
        Some(outcome)
    }
}
