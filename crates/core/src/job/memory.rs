//! In-memory job store for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use super::store::{JobStore, JobStoreError};
use super::types::Job;

/// HashMap-backed job store. Contents are lost on restart; durability is
/// the store backend's concern, not the pipeline's.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().expect("job map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobStore for InMemoryJobStore {
    fn get(&self, job_id: &str) -> Result<Option<Job>, JobStoreError> {
        Ok(self.jobs.read().expect("job map poisoned").get(job_id).cloned())
    }

    fn set(&self, job: &Job) -> Result<(), JobStoreError> {
        self.jobs
            .write()
            .expect("job map poisoned")
            .insert(job.job_id.clone(), job.clone());
        Ok(())
    }
}
