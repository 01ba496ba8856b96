//! SQLite-backed append-only store for mistake and verdict records.
//!
//! Every operation opens its own connection: a database that cannot be
//! opened only fails the call that needed it, and independent sessions (or
//! processes) share the file through SQLite's own locking. Each append is a
//! single `INSERT` and therefore atomic.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{params, Connection};
use thiserror::Error;

use super::records::{MistakeCount, MistakeRecord, NewVerdict, RecordId, VerdictRecord};

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised by [`RecordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file or its directory could not be opened or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Durable record store shared by every session in the process.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS mistakes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_input TEXT NOT NULL,
            corrected_output TEXT NOT NULL,
            error_type TEXT NOT NULL,
            timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS verdicts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            theme TEXT NOT NULL,
            user1_name TEXT NOT NULL,
            user2_name TEXT NOT NULL,
            user1_input TEXT NOT NULL,
            user2_input TEXT NOT NULL,
            verdict TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_mistakes_error_type
        ON mistakes(error_type);
    ";

    /// Point the store at `path`. Nothing is opened until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against this store on tokio's blocking pool.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&RecordStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable(format!("storage task failed: {e}")))?
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(Self::SCHEMA)?;
        Ok(conn)
    }

    // -----------------------------------------------------------------------
    // Mistakes
    // -----------------------------------------------------------------------

    /// Append a mistake record and return its id.
    pub fn record_mistake(
        &self,
        user_input: &str,
        corrected_output: &str,
        error_type: &str,
    ) -> Result<RecordId, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO mistakes (user_input, corrected_output, error_type)
             VALUES (?1, ?2, ?3)",
            params![user_input, corrected_output, error_type],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("store: recorded mistake #{id} ({error_type})");
        Ok(id)
    }

    /// Count stored mistakes per error type, ordered by error type.
    pub fn summarize_mistakes_by_type(&self) -> Result<Vec<MistakeCount>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT error_type, COUNT(*)
             FROM mistakes
             GROUP BY error_type
             ORDER BY error_type ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let error_type: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok(MistakeCount {
                error_type,
                count: count as u64,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Most recent mistakes first; `None` returns all of them.
    pub fn list_recent_mistakes(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<MistakeRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_input, corrected_output, error_type, timestamp
             FROM mistakes
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![sql_limit(limit)], |row| {
            Ok(MistakeRecord {
                id: row.get(0)?,
                user_input: row.get(1)?,
                corrected_output: row.get(2)?,
                error_type: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // -----------------------------------------------------------------------
    // Verdicts
    // -----------------------------------------------------------------------

    /// Append a verdict record and return its id.
    pub fn record_verdict(&self, verdict: &NewVerdict) -> Result<RecordId, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO verdicts
                 (theme, user1_name, user2_name, user1_input, user2_input, verdict)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &verdict.theme,
                &verdict.user1_name,
                &verdict.user2_name,
                &verdict.user1_input,
                &verdict.user2_input,
                &verdict.verdict,
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("store: recorded verdict #{id} ({})", verdict.theme);
        Ok(id)
    }

    /// Most recent verdicts first; `None` returns all of them.
    pub fn list_recent_verdicts(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<VerdictRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, theme, user1_name, user2_name, user1_input, user2_input,
                    verdict, created_at
             FROM verdicts
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![sql_limit(limit)], |row| {
            Ok(VerdictRecord {
                id: row.get(0)?,
                theme: row.get(1)?,
                user1_name: row.get(2)?,
                user2_name: row.get(3)?,
                user1_input: row.get(4)?,
                user2_input: row.get(5)?,
                verdict: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// SQLite treats a negative `LIMIT` as unbounded.
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn temp_store() -> (TempDir, RecordStore) {
        let dir = tempdir().expect("temp dir");
        let store = RecordStore::new(dir.path().join("records.db"));
        (dir, store)
    }

    fn verdict(theme: &str, text: &str) -> NewVerdict {
        NewVerdict {
            theme: theme.into(),
            user1_name: "Ana".into(),
            user2_name: "Ben".into(),
            user1_input: "He never does the dishes.".into(),
            user2_input: "I cook every night.".into(),
            verdict: text.into(),
        }
    }

    #[test]
    fn mistake_round_trip_counts_once() {
        let (_dir, store) = temp_store();
        let id = store
            .record_mistake("Yo soy", "Debería ser 'Soy'", "language mistake")
            .unwrap();
        assert!(id > 0);

        let summary = store.summarize_mistakes_by_type().unwrap();
        assert_eq!(
            summary,
            vec![MistakeCount {
                error_type: "language mistake".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn summary_counts_match_inserts_regardless_of_order() {
        let (_dir, store) = temp_store();
        let types = ["vocab", "grammar", "vocab", "syntax", "grammar", "vocab"];
        for (i, t) in types.iter().enumerate() {
            store.record_mistake(&format!("input {i}"), "fix", t).unwrap();
        }

        let summary = store.summarize_mistakes_by_type().unwrap();
        let as_pairs: Vec<(&str, u64)> = summary
            .iter()
            .map(|c| (c.error_type.as_str(), c.count))
            .collect();
        assert_eq!(as_pairs, vec![("grammar", 2), ("syntax", 1), ("vocab", 3)]);

        // Stable across repeated calls with no writes in between.
        assert_eq!(store.summarize_mistakes_by_type().unwrap(), summary);
    }

    #[test]
    fn empty_store_has_empty_summary() {
        let (_dir, store) = temp_store();
        assert!(store.summarize_mistakes_by_type().unwrap().is_empty());
        assert!(store.list_recent_verdicts(None).unwrap().is_empty());
    }

    #[test]
    fn ids_increase_monotonically() {
        let (_dir, store) = temp_store();
        let a = store.record_mistake("a", "b", "t").unwrap();
        let b = store.record_mistake("c", "d", "t").unwrap();
        let c = store.record_verdict(&verdict("Family", "50% vs 50%")).unwrap();
        let d = store.record_verdict(&verdict("Family", "70% vs 30%")).unwrap();
        assert!(b > a);
        assert!(d > c);
    }

    #[test]
    fn recent_mistakes_are_newest_first() {
        let (_dir, store) = temp_store();
        store.record_mistake("first", "fix", "t").unwrap();
        store.record_mistake("second", "fix", "t").unwrap();

        let recent = store.list_recent_mistakes(None).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_input, "second");
        assert_eq!(recent[1].user_input, "first");
        assert_eq!(recent[0].corrected_output, "fix");
    }

    #[test]
    fn recent_verdicts_are_newest_first_and_limited() {
        let (_dir, store) = temp_store();
        for i in 0..5 {
            store
                .record_verdict(&verdict("Roommates", &format!("verdict {i}")))
                .unwrap();
        }

        let recent = store.list_recent_verdicts(Some(3)).unwrap();
        let texts: Vec<_> = recent.iter().map(|v| v.verdict.as_str()).collect();
        assert_eq!(texts, vec!["verdict 4", "verdict 3", "verdict 2"]);

        let all = store.list_recent_verdicts(None).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].theme, "Roommates");
        assert_eq!(all[0].user1_name, "Ana");
        assert_eq!(all[0].user2_input, "I cook every night.");

        assert!(store.list_recent_verdicts(Some(0)).unwrap().is_empty());
    }

    #[test]
    fn records_survive_reopening() {
        let (dir, store) = temp_store();
        store.record_mistake("Yo soy", "Soy", "language mistake").unwrap();
        drop(store);

        let reopened = RecordStore::new(dir.path().join("records.db"));
        assert_eq!(reopened.list_recent_mistakes(None).unwrap().len(), 1);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested").join("deeper").join("r.db"));
        store.record_mistake("a", "b", "c").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn unwritable_location_is_reported_as_unavailable() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let store = RecordStore::new(blocker.join("records.db"));
        let err = store.record_mistake("a", "b", "c").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.summarize_mistakes_by_type().is_err());
    }

    #[tokio::test]
    async fn run_blocking_executes_on_the_store() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);
        let id = store
            .run_blocking(|s| s.record_mistake("Yo soy", "Soy", "language mistake"))
            .await
            .unwrap();
        assert!(id > 0);
        assert_eq!(store.list_recent_mistakes(Some(1)).unwrap()[0].id, id);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);
        // Create the schema before the writers race.
        assert!(store.summarize_mistakes_by_type().unwrap().is_empty());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .record_mistake(&format!("w{worker}-{i}"), "fix", &format!("type{worker}"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let summary = store.summarize_mistakes_by_type().unwrap();
        assert_eq!(summary.len(), 4);
        assert!(summary.iter().all(|c| c.count == 10));
    }
}
