//! SQLite-backed job store implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::store::{JobStore, JobStoreError};
use super::types::Job;

/// SQLite-backed job store.
///
/// Jobs are stored as JSON keyed by id; the status column is duplicated
/// for ad-hoc inspection of the database, the record column is the source
/// of truth.
pub struct SqliteJobStore {
    conn: Mutex<Connection>,
}

impl SqliteJobStore {
    /// Open (or create) the database file and its schema.
    pub fn new(path: &Path) -> Result<Self, JobStoreError> {
        let conn = Connection::open(path).map_err(|e| JobStoreError::Storage(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, JobStoreError> {
        let conn = Connection::open_in_memory().map_err(|e| JobStoreError::Storage(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), JobStoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                job_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                record TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
            CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
            "#,
        )
        .map_err(|e| JobStoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl JobStore for SqliteJobStore {
    fn get(&self, job_id: &str) -> Result<Option<Job>, JobStoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        let record: Option<String> = conn
            .query_row("SELECT record FROM jobs WHERE job_id = ?1", params![job_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| JobStoreError::Storage(e.to_string()))?;

        match record {
            Some(json) => {
                let job = serde_json::from_str(&json).map_err(|e| JobStoreError::Corrupt {
                    job_id: job_id.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    fn set(&self, job: &Job) -> Result<(), JobStoreError> {
        let record = serde_json::to_string(job).map_err(|e| JobStoreError::Storage(e.to_string()))?;
        let conn = self.conn.lock().expect("connection poisoned");
        conn.execute(
            r#"
            INSERT INTO jobs (job_id, status, record, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(job_id) DO UPDATE SET status = ?2, record = ?3
            "#,
            params![
                job.job_id,
                job.status.as_str(),
                record,
                job.created_at.to_rfc3339()
            ],
        )
        .map_err(|e| JobStoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::types::{JobPatch, JobStatus};

    #[test]
    fn test_set_then_get_roundtrip() {
        let store = SqliteJobStore::in_memory().unwrap();
        let mut job = Job::new("job_1", "@someChannel", "user@example.com");
        job.apply(JobPatch::status(JobStatus::ResolvingChannel).with_channel("UC1", "Some Channel"));

        store.set(&job).unwrap();
        let loaded = store.get("job_1").unwrap().unwrap();
        assert_eq!(loaded, job);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteJobStore::in_memory().unwrap();
        assert!(store.get("job_missing").unwrap().is_none());
    }

    #[test]
    fn test_set_upserts() {
        let store = SqliteJobStore::in_memory().unwrap();
        let mut job = Job::new("job_1", "@c", "user@example.com");
        store.set(&job).unwrap();

        job.apply(JobPatch::failure(JobStatus::Failed, "Channel not found"));
        store.set(&job).unwrap();

        let loaded = store.get("job_1").unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Failed);
        assert_eq!(loaded.error.as_deref(), Some("Channel not found"));
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("jobs.db");

        {
            let store = SqliteJobStore::new(&path).unwrap();
            store.set(&Job::new("job_1", "@c", "user@example.com")).unwrap();
        }

        let reopened = SqliteJobStore::new(&path).unwrap();
        assert!(reopened.get("job_1").unwrap().is_some());
    }
}
