//! Percentage split extraction from free-text verdicts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Responsibility split between the two parties, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Split {
    pub first: u8,
    pub second: u8,
}

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})%").expect("valid percent regex"));

/// The first two percent-tagged numbers in reading order, assigned to party
/// one and party two.
///
/// Returns `None` when fewer than two are present, or when either exceeds
/// 100.
pub fn parse_split(verdict: &str) -> Option<Split> {
    let mut values = PERCENT_RE
        .captures_iter(verdict)
        .filter_map(|caps| caps[1].parse::<u16>().ok());

    let first = values.next()?;
    let second = values.next()?;
    if first > 100 || second > 100 {
        return None;
    }
    Some(Split {
        first: first as u8,
        second: second as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_two_percentages() {
        let split = parse_split("After weighing it all... 60% vs 40%... be kind.").unwrap();
        assert_eq!(split, Split { first: 60, second: 40 });
    }

    #[test]
    fn later_percentages_are_ignored() {
        let split = parse_split("Ana 70%, Ben 30%. Earlier I'd have said 50% each.").unwrap();
        assert_eq!(split, Split { first: 70, second: 30 });
    }

    #[test]
    fn zero_or_one_percentage_yields_none() {
        assert_eq!(parse_split("Both of you should apologise."), None);
        assert_eq!(parse_split("Ana is 100% right."), None);
    }

    #[test]
    fn bare_numbers_do_not_count() {
        assert_eq!(parse_split("60 vs 40"), None);
        assert_eq!(parse_split("60 % vs 40 %"), None);
    }

    #[test]
    fn values_above_hundred_are_rejected() {
        assert_eq!(parse_split("150% vs 40%"), None);
    }

    #[test]
    fn percent_pattern_compiles_and_captures_digits() {
        let caps = PERCENT_RE.captures("about 75% of it").unwrap();
        assert_eq!(&caps[1], "75");
    }

    #[test]
    fn boundary_values_are_accepted() {
        assert_eq!(
            parse_split("0% vs 100%"),
            Some(Split { first: 0, second: 100 })
        );
    }
}
