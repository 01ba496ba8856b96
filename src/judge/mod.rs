//! JudgeBot: arbitration of two-party conflicts.

pub mod protocol;
pub mod split;
pub mod theme;

pub use protocol::{Arbiter, ConflictForm, Ruling};
pub use split::{parse_split, Split};
pub use theme::ConflictTheme;
