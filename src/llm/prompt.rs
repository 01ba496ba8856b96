//! Prompt builders for tutoring, correction, translation and arbitration.
//!
//! Tutoring, correction and translation prompts are sent as a single user
//! message. Arbitration is sent as a `(system_msg, user_msg)` pair, like any
//! OpenAI-compatible chat request with a system role.

use crate::config::Level;

/// Substring a correction reply contains when the learner's sentence is fine.
pub const NO_MISTAKES_SENTINEL: &str = "No mistakes";

/// The exact phrase the correction prompt asks for.
pub const NO_MISTAKES_REPLY: &str = "No mistakes found.";

// ---------------------------------------------------------------------------
// Language tutoring
// ---------------------------------------------------------------------------

/// Languages and level shared by every prompt in a tutoring session.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePair {
    pub known: String,
    pub target: String,
    pub level: Level,
}

impl LanguagePair {
    pub fn new(known: impl Into<String>, target: impl Into<String>, level: Level) -> Self {
        Self {
            known: known.into(),
            target: target.into(),
            level,
        }
    }

    /// Conversational tutor reply in the target language.
    pub fn tutoring_prompt(&self, utterance: &str) -> String {
        format!(
            "You are a friendly and supportive language tutor.\n\
             You are chatting in {target} with a user who speaks {known} and is at a {level} level.\n\
             Keep the conversation flowing, correct mistakes gently if needed, and encourage the user.\n\
             \n\
             User says: {utterance}\n\
             Respond in {target}:",
            target = self.target,
            known = self.known,
            level = self.level,
        )
    }

    /// Natural translation from the known into the target language.
    pub fn translation_prompt(&self, utterance: &str) -> String {
        format!(
            "You are a translation assistant.\n\
             Translate this message from {known} into {target}, and make it sound natural.\n\
             \n\
             Input: {utterance}\n\
             Output:",
            known = self.known,
            target = self.target,
        )
    }

    /// Mistake check for a learner's sentence, answered in the known language.
    pub fn correction_prompt(&self, utterance: &str) -> String {
        format!(
            "Here is a sentence by a {target} learner:\n\
             \"{utterance}\"\n\
             \n\
             If there are any mistakes, correct them and specify the type (grammar, vocab, syntax).\n\
             If correct, say \"{NO_MISTAKES_REPLY}\".\n\
             Respond in {known}.",
            target = self.target,
            known = self.known,
        )
    }
}

// ---------------------------------------------------------------------------
// Arbitration
// ---------------------------------------------------------------------------

/// Build the `(system_msg, user_msg)` pair for a two-party verdict.
pub fn arbitration_chat(
    theme: &str,
    user1_name: &str,
    user1_input: &str,
    user2_name: &str,
    user2_input: &str,
) -> (String, String) {
    let system_msg = format!(
        "You are JudgeBot, an impartial and empathetic arbitrator for {theme} conflicts.\n\
         Weigh both sides fairly, explain your reasoning briefly, and suggest how to move forward.\n\
         Always end with the split of responsibility as two percentages that add up to 100, \
         written as \"<first party>% vs <second party>%\" (e.g. 60% vs 40%)."
    );

    let user_msg = format!(
        "Conflict theme: {theme}\n\
         \n\
         {user1_name} says:\n\
         {user1_input}\n\
         \n\
         {user2_name} says:\n\
         {user2_input}\n\
         \n\
         Who is more in the right? Give your verdict and the percentage split, \
         listing {user1_name} first and {user2_name} second."
    );

    (system_msg, user_msg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
