//! Immutable records persisted by the [`RecordStore`](super::RecordStore).

use chrono::NaiveDateTime;
use serde::Serialize;

/// Auto-assigned, monotonically increasing row identifier.
pub type RecordId = i64;

/// A learner utterance that was judged incorrect.
#[derive(Debug, Clone, PartialEq)]
pub struct MistakeRecord {
    pub id: RecordId,
    pub user_input: String,
    pub corrected_output: String,
    pub error_type: String,
    /// Insert time assigned by the store (UTC).
    pub timestamp: NaiveDateTime,
}

/// Outcome of one arbitration request.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictRecord {
    pub id: RecordId,
    pub theme: String,
    pub user1_name: String,
    pub user2_name: String,
    pub user1_input: String,
    pub user2_input: String,
    pub verdict: String,
    /// Insert time assigned by the store (UTC).
    pub created_at: NaiveDateTime,
}

/// Fields of a verdict before the store assigns its id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVerdict {
    pub theme: String,
    pub user1_name: String,
    pub user2_name: String,
    pub user1_input: String,
    pub user2_input: String,
    pub verdict: String,
}

/// One bucket of the mistake summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistakeCount {
    pub error_type: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn summary_bucket_serializes_for_output() {
        let bucket = MistakeCount {
            error_type: "language mistake".into(),
            count: 3,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["error_type"], "language mistake");
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn records_carry_store_timestamps() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let record = MistakeRecord {
            id: 1,
            user_input: "Yo soy".into(),
            corrected_output: "Debería ser 'Soy'".into(),
            error_type: "language mistake".into(),
            timestamp: at,
        };
        assert_eq!(record.clone(), record);
        assert_eq!(record.timestamp.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 09:30");
    }
}
