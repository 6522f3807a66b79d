//! Job storage trait and the shared patch helper.

use thiserror::Error;
use tracing::debug;

use super::types::{Job, JobPatch};

/// Error type for job store operations.
#[derive(Debug, Error)]
pub enum JobStoreError {
    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored record could not be decoded.
    #[error("corrupt job record {job_id}: {message}")]
    Corrupt { job_id: String, message: String },
}

/// Keyed persistence for job records.
///
/// Plain get/set semantics, no compare-and-swap: callers always
/// read-then-merge-then-write. The pipeline is strictly linear per job, so
/// no two steps ever race on the same record.
pub trait JobStore: Send + Sync {
    /// Fetch a job by id. `None` if it was never written.
    fn get(&self, job_id: &str) -> Result<Option<Job>, JobStoreError>;

    /// Write a job record, replacing any previous version.
    fn set(&self, job: &Job) -> Result<(), JobStoreError>;
}

/// Read-modify-write a job with an additive patch.
///
/// Returns the merged job, or `None` when the job does not exist or is
/// already terminal. Terminal jobs are never mutated again; a stale event
/// replayed after completion or failure becomes a no-op here.
pub fn apply_patch(
    store: &dyn JobStore,
    job_id: &str,
    patch: JobPatch,
) -> Result<Option<Job>, JobStoreError> {
    let Some(mut job) = store.get(job_id)? else {
        debug!(job_id = %job_id, "Patch skipped: job not found");
        return Ok(None);
    };

    if job.status.is_terminal() {
        debug!(job_id = %job_id, status = %job.status, "Patch skipped: job is terminal");
        return Ok(None);
    }

    job.apply(patch);
    store.set(&job)?;
    Ok(Some(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::memory::InMemoryJobStore;
    use crate::job::types::JobStatus;

    #[test]
    fn test_apply_patch_merges_and_persists() {
        let store = InMemoryJobStore::new();
        store.set(&Job::new("job_1", "@c", "user@example.com")).unwrap();

        let updated = apply_patch(
            &store,
            "job_1",
            JobPatch::status(JobStatus::ResolvingChannel).with_channel("UC1", "C"),
        )
        .unwrap()
        .expect("job should be patched");

        assert_eq!(updated.status, JobStatus::ResolvingChannel);
        let stored = store.get("job_1").unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_apply_patch_missing_job_is_noop() {
        let store = InMemoryJobStore::new();
        let result = apply_patch(&store, "job_missing", JobPatch::status(JobStatus::Error)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_apply_patch_never_mutates_terminal_job() {
        let store = InMemoryJobStore::new();
        let mut job = Job::new("job_1", "@c", "user@example.com");
        job.apply(JobPatch::failure(JobStatus::Failed, "Channel not found"));
        store.set(&job).unwrap();

        let result = apply_patch(&store, "job_1", JobPatch::status(JobStatus::SendingEmail)).unwrap();
        assert!(result.is_none());

        let stored = store.get("job_1").unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error.as_deref(), Some("Channel not found"));
    }
}
