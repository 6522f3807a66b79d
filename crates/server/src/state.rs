use std::sync::Arc;
use titledoctor_core::job::JobStore;
use titledoctor_core::pipeline::Submitter;
use titledoctor_core::{Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    job_store: Arc<dyn JobStore>,
    submitter: Submitter,
}

impl AppState {
    pub fn new(config: Config, job_store: Arc<dyn JobStore>, submitter: Submitter) -> Self {
        Self {
            config,
            job_store,
            submitter,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn job_store(&self) -> &dyn JobStore {
        self.job_store.as_ref()
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }
}
