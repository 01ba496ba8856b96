//! Terminal front-end.
//!
//! [`App`] owns the shared collaborators (chat client, record store, speech
//! capture) and drives the tutoring REPL, the arbitration form and the
//! record listings. Output goes to any [`std::io::Write`], input comes from
//! any [`AsyncBufRead`], so the whole front-end runs against in-memory
//! buffers in tests.
//!
//! # REPL commands
//!
//! | Input | Effect |
//! |-------|--------|
//! | any text | run one tutoring turn |
//! | `/listen [text]` | capture speech; `text` is used when capture fails |
//! | `/voice` | toggle spoken replies |
//! | `/history [n]` | show the last `n` turns (default 10) |
//! | `/reset` | clear the conversation |
//! | `/export` | write the conversation as PDF |
//! | `/summary` | mistake counts per error type |
//! | `/help` | list commands |
//! | `/quit` | leave |

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::{AppConfig, TutorMode};
use crate::error::AppError;
use crate::export::{save_document, timestamped_name, transcript_pdf, verdict_pdf};
use crate::judge::{Arbiter, ConflictForm, Ruling, Split};
use crate::llm::{ApiChatClient, ChatClient};
use crate::session::ConversationTurn;
use crate::speech::{
    is_capture_failure, resolve_input, CommandCapture, SpeechCapture, SpeechSynthesizer,
    TranslateTts,
};
use crate::store::{RecordStore, VerdictRecord};
use crate::tutor::{TurnOutcome, TutorSession};

const DEFAULT_HISTORY: usize = 10;
const SPLIT_BAR_WIDTH: usize = 20;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    Listen(String),
    Voice,
    History(usize),
    Reset,
    Export,
    Summary,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "listen" => Command::Listen(arg.to_string()),
        "voice" => Command::Voice,
        "history" => Command::History(arg.parse().unwrap_or(DEFAULT_HISTORY)),
        "reset" => Command::Reset,
        "export" => Command::Export,
        "summary" => Command::Summary,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_turn(turn: &ConversationTurn) -> String {
    format!("{}: {}", turn.role.label(), turn.text)
}

pub fn render_notice(notice: &AppError) -> String {
    if notice.is_warning() {
        format!("warning: {notice}")
    } else {
        format!("error: {notice}")
    }
}

/// `Ana 60% [############--------] 40% Ben`
pub fn split_bar(user1_name: &str, user2_name: &str, split: Split) -> String {
    let filled = (usize::from(split.first) * SPLIT_BAR_WIDTH + 50) / 100;
    let filled = filled.min(SPLIT_BAR_WIDTH);
    format!(
        "{user1_name} {}% [{}{}] {}% {user2_name}",
        split.first,
        "#".repeat(filled),
        "-".repeat(SPLIT_BAR_WIDTH - filled),
        split.second,
    )
}

fn print_notices<W: Write>(out: &mut W, notices: &[AppError]) -> std::io::Result<()> {
    for notice in notices {
        writeln!(out, "{}", render_notice(notice))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    config: AppConfig,
    chat: Arc<dyn ChatClient>,
    store: Arc<RecordStore>,
    capture: Arc<dyn SpeechCapture>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(
        config: AppConfig,
        chat: Arc<dyn ChatClient>,
        store: Arc<RecordStore>,
        capture: Arc<dyn SpeechCapture>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            chat,
            store,
            capture,
            export_dir,
        }
    }

    /// Wire up the HTTP chat client, the on-disk store and command capture
    /// from `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let chat: Arc<dyn ChatClient> = Arc::new(ApiChatClient::from_config(&config.llm));
        let store = Arc::new(RecordStore::new(config.storage.resolved_path()));
        let capture: Arc<dyn SpeechCapture> =
            Arc::new(CommandCapture::new(&config.speech.capture_command));
        let export_dir = config.export.resolved_dir();
        log::debug!(
            "app: store={} exports={}",
            store.path().display(),
            export_dir.display()
        );
        Self::new(config, chat, store, capture, export_dir)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    fn synthesizer(&self) -> Arc<dyn SpeechSynthesizer> {
        Arc::new(TranslateTts::from_config(&self.config.speech))
    }

    /// A fresh tutoring session in `mode`, speaking replies when
    /// `speech.enabled` is set.
    pub fn tutor_session(&self, mode: TutorMode) -> TutorSession {
        let mut config = self.config.clone();
        config.tutor.mode = mode;
        let mut session =
            TutorSession::from_config(&config, Arc::clone(&self.chat), Arc::clone(&self.store));
        if self.config.speech.enabled {
            session.set_voice(Some(self.synthesizer()));
        }
        session
    }

    // -----------------------------------------------------------------------
    // Tutoring
    // -----------------------------------------------------------------------

    /// Run the interactive loop until `/quit` or end of input.
    pub async fn tutor_repl<R, W>(
        &self,
        session: &mut TutorSession,
        input: R,
        out: &mut W,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let languages = session.languages().clone();
        writeln!(
            out,
            "{} → {} ({}, {:?} mode). Type /help for commands.",
            languages.known,
            languages.target,
            languages.level,
            session.mode()
        )?;
        out.flush()?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                Command::Say(text) => self.tutor_turn(session, &text, out).await?,
                Command::Listen(typed) => {
                    let heard = self.capture.capture().await;
                    let text = resolve_input(Some(heard.as_str()), &typed);
                    if is_capture_failure(&heard) {
                        writeln!(out, "warning: {heard}")?;
                    } else {
                        writeln!(out, "(heard) {text}")?;
                    }
                    self.tutor_turn(session, &text, out).await?;
                }
                Command::Voice => {
                    if session.voice_enabled() {
                        session.set_voice(None);
                        writeln!(out, "Voice output off.")?;
                    } else {
                        session.set_voice(Some(self.synthesizer()));
                        writeln!(out, "Voice output on.")?;
                    }
                }
                Command::History(n) => {
                    for turn in session.recent_turns(n) {
                        writeln!(out, "{}", render_turn(turn))?;
                    }
                }
                Command::Reset => {
                    session.reset();
                    writeln!(out, "Conversation cleared.")?;
                }
                Command::Export => self.export_transcript(session, out)?,
                Command::Summary => self.summary(out).await?,
                Command::Help => writeln!(
                    out,
                    "Commands: /listen [text], /voice, /history [n], /reset, /export, /summary, /quit"
                )?,
                Command::Quit => break,
                Command::Unknown(name) => writeln!(out, "warning: unknown command /{name}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Run one turn and print what it produced.
    pub async fn tutor_turn<W: Write>(
        &self,
        session: &mut TutorSession,
        utterance: &str,
        out: &mut W,
    ) -> std::io::Result<()> {
        let Some(outcome) = session.run_turn(utterance).await else {
            return Ok(());
        };
        self.print_outcome(&outcome, out)
    }

    fn print_outcome<W: Write>(&self, outcome: &TurnOutcome, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Bot: {}", outcome.reply)?;
        if let Some(correction) = &outcome.correction {
            writeln!(out, "Correction: {correction}")?;
        }
        if let Some(audio) = &outcome.audio {
            match save_document(&self.export_dir, &timestamped_name("reply", "mp3"), audio) {
                Ok(path) => writeln!(out, "(audio) {}", path.display())?,
                Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e)))?,
            }
        }
        print_notices(out, &outcome.notices)
    }

    fn export_transcript<W: Write>(
        &self,
        session: &TutorSession,
        out: &mut W,
    ) -> std::io::Result<()> {
        let saved = transcript_pdf(session.transcript().turns()).and_then(|bytes| {
            save_document(
                &self.export_dir,
                &timestamped_name("chat_history", "pdf"),
                &bytes,
            )
        });
        match saved {
            Ok(path) => writeln!(out, "Saved {}", path.display()),
            Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e))),
        }
    }

    // -----------------------------------------------------------------------
    // Arbitration
    // -----------------------------------------------------------------------

    /// Run one arbitration and print the verdict; `export` also writes it as
    /// PDF.
    pub async fn judge<W: Write>(
        &self,
        form: &ConflictForm,
        export: bool,
        out: &mut W,
    ) -> std::io::Result<Ruling> {
        let arbiter = Arbiter::new(Arc::clone(&self.chat), Arc::clone(&self.store))
            .with_temperature(self.config.judge.temperature);
        let ruling = arbiter.arbitrate(form).await;

        if let Some(verdict) = &ruling.verdict {
            writeln!(out, "JudgeBot ({}):", form.theme)?;
            writeln!(out, "{verdict}")?;
            match ruling.split {
                Some(split) => writeln!(
                    out,
                    "{}",
                    split_bar(form.user1_name.trim(), form.user2_name.trim(), split)
                )?,
                None => writeln!(out, "(no percentage split given)")?,
            }

            if export {
                let record = VerdictRecord {
                    id: ruling.record_id.unwrap_or_default(),
                    theme: form.theme.label().to_string(),
                    user1_name: form.user1_name.trim().to_string(),
                    user2_name: form.user2_name.trim().to_string(),
                    user1_input: form.user1_input.trim().to_string(),
                    user2_input: form.user2_input.trim().to_string(),
                    verdict: verdict.clone(),
                    created_at: chrono::Utc::now().naive_utc(),
                };
                let saved = verdict_pdf(&record, ruling.split).and_then(|bytes| {
                    save_document(&self.export_dir, &timestamped_name("verdict", "pdf"), &bytes)
                });
                match saved {
                    Ok(path) => writeln!(out, "Saved {}", path.display())?,
                    Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e)))?,
                }
            }
        }
        print_notices(out, &ruling.notices)?;
        Ok(ruling)
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    pub async fn summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self
            .store
            .run_blocking(|store| store.summarize_mistakes_by_type())
            .await
        {
            Ok(counts) if counts.is_empty() => writeln!(out, "No mistakes recorded yet."),
            Ok(counts) => {
                writeln!(out, "Mistake summary:")?;
                for bucket in counts {
                    writeln!(out, "  {:<24} {}", bucket.error_type, bucket.count)?;
                }
                Ok(())
            }
            Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e))),
        }
    }

    pub async fn mistakes<W: Write>(&self, limit: Option<usize>, out: &mut W) -> std::io::Result<()> {
        match self
            .store
            .run_blocking(move |store| store.list_recent_mistakes(limit))
            .await
        {
            Ok(records) if records.is_empty() => writeln!(out, "No mistakes recorded yet."),
            Ok(records) => {
                for record in records {
                    writeln!(
                        out,
                        "[{}] {}\n    {}",
                        record.timestamp.format("%Y-%m-%d %H:%M"),
                        record.user_input,
                        record.corrected_output
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e))),
        }
    }

    pub async fn verdicts<W: Write>(&self, limit: Option<usize>, out: &mut W) -> std::io::Result<()> {
        match self
            .store
            .run_blocking(move |store| store.list_recent_verdicts(limit))
            .await
        {
            Ok(records) if records.is_empty() => writeln!(out, "No verdicts recorded yet."),
            Ok(records) => {
                for record in records {
                    writeln!(
                        out,
                        "#{} [{}] {} vs {} ({})\n    {}",
                        record.id,
                        record.created_at.format("%Y-%m-%d %H:%M"),
                        record.user1_name,
                        record.user2_name,
                        record.theme,
                        record.verdict
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(out, "{}", render_notice(&AppError::from(e))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
