//! Fixed set of conflict themes offered by the arbitration form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ConflictTheme {
    Relationship,
    Family,
    Friendship,
    Roommates,
    Workplace,
    Money,
    Other,
}

impl ConflictTheme {
    pub const ALL: [ConflictTheme; 7] = [
        ConflictTheme::Relationship,
        ConflictTheme::Family,
        ConflictTheme::Friendship,
        ConflictTheme::Roommates,
        ConflictTheme::Workplace,
        ConflictTheme::Money,
        ConflictTheme::Other,
    ];

    /// Label stored with each verdict and embedded in the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            ConflictTheme::Relationship => "Relationship",
            ConflictTheme::Family => "Family",
            ConflictTheme::Friendship => "Friendship",
            ConflictTheme::Roommates => "Roommates",
            ConflictTheme::Workplace => "Workplace",
            ConflictTheme::Money => "Money",
            ConflictTheme::Other => "Other",
        }
    }
}

impl std::fmt::Display for ConflictTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConflictTheme {
    type Err = String;

    /// Case-insensitive match on the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown conflict theme: {wanted}"))
    }
}
