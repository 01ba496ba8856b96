//! Ordered conversation transcript for one interactive session.
//!
//! A [`Transcript`] is owned by exactly one session object and is never
//! shared, so it needs no locking. Insertion order is chronological order.

use serde::Serialize;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnRole {
    User,
    Assistant,
    Correction,
}

impl TurnRole {
    /// Display label used by the terminal front-end and document export.
    pub fn label(&self) -> &'static str {
        match self {
            TurnRole::User => "You",
            TurnRole::Assistant => "Bot",
            TurnRole::Correction => "Correction",
        }
    }
}

/// One role-tagged message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// In-memory transcript, created empty at session start.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every turn.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn append_turn(&mut self, role: TurnRole, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, text));
    }

    /// The last `n` turns in chronological order; fewer when the transcript
    /// is shorter.
    pub fn last_n(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
