//! Persistent record store for mistakes and verdicts.

pub mod db;
pub mod records;

pub use db::{RecordStore, StoreError};
pub use records::{MistakeCount, MistakeRecord, NewVerdict, RecordId, VerdictRecord};
