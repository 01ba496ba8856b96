//! Language tutoring and translation turns.

pub mod session;

pub use session::{is_no_mistakes, TurnOutcome, TutorSession, LANGUAGE_MISTAKE};
