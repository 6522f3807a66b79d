//! Job intake: validation, job creation, first event.

use std::sync::Arc;
use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::bus::{EventBus, PipelineEvent};
use crate::job::{Job, JobStore, JobStoreError};

/// Error type for submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Request rejected before any job was created.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] JobStoreError),
}

/// What the requester gets back for an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub job_id: String,
    pub message: String,
}

/// Accepts title-improvement requests.
///
/// An accepted submission performs exactly one store write and one event
/// publish; a rejected one performs neither.
pub struct Submitter {
    store: Arc<dyn JobStore>,
    bus: Arc<EventBus>,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Shape check only: local part, @, domain with at least one dot.
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

impl Submitter {
    pub fn new(store: Arc<dyn JobStore>, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    /// Validate and enqueue a request.
    pub fn submit(&self, channel: &str, email: &str) -> Result<SubmitReceipt, SubmitError> {
        let channel = channel.trim();
        let email = email.trim();

        if channel.is_empty() {
            return Err(SubmitError::Validation(
                "Channel name or handle is required".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(SubmitError::Validation("Email address is required".to_string()));
        }
        if !email_pattern().is_match(email) {
            return Err(SubmitError::Validation(
                "Email address is not valid".to_string(),
            ));
        }

        let job_id = format!("job_{}", Uuid::new_v4());
        let job = Job::new(&job_id, channel, email);
        self.store.set(&job)?;

        self.bus.publish(PipelineEvent::Submitted {
            job_id: job_id.clone(),
            channel: channel.to_string(),
            email: email.to_string(),
        });

        info!(job_id = %job_id, channel = %channel, "Job queued");

        Ok(SubmitReceipt {
            job_id,
            message: format!(
                "Your request is queued. Improved titles will be emailed to {}.",
                email
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use crate::job::{InMemoryJobStore, JobStatus};

    fn submitter() -> (Submitter, Arc<InMemoryJobStore>, Arc<EventBus>) {
        let store = Arc::new(InMemoryJobStore::new());
        let bus = Arc::new(EventBus::new());
        let submitter = Submitter::new(store.clone(), bus.clone());
        (submitter, store, bus)
    }

    #[tokio::test]
    async fn test_accepted_submission_stores_and_publishes() {
        let (submitter, store, bus) = submitter();
        let mut rx = bus.subscribe(Topic::Submitted).unwrap();

        let receipt = submitter.submit("@someChannel", "user@example.com").unwrap();
        assert!(receipt.job_id.starts_with("job_"));
        assert!(receipt.message.contains("user@example.com"));

        let job = store.get(&receipt.job_id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.channel, "@someChannel");

        let event = rx.recv().await.unwrap();
        let PipelineEvent::Submitted { job_id, channel, email } = event else {
            panic!("expected Submitted event");
        };
        assert_eq!(job_id, receipt.job_id);
        assert_eq!(channel, "@someChannel");
        assert_eq!(email, "user@example.com");
    }

    #[test]
    fn test_submissions_get_distinct_ids() {
        let (submitter, ..) = submitter();
        let a = submitter.submit("@a", "a@example.com").unwrap();
        let b = submitter.submit("@a", "a@example.com").unwrap();
        assert_ne!(a.job_id, b.job_id);
    }

    #[test]
    fn test_rejects_blank_channel() {
        let (submitter, store, _bus) = submitter();
        let err = submitter.submit("   ", "user@example.com").unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_bad_email_shapes() {
        let (submitter, store, _bus) = submitter();
        for email in ["", "plainstring", "user@nodot", "two words@example.com", "user@@example.com"] {
            assert!(
                matches!(submitter.submit("@c", email), Err(SubmitError::Validation(_))),
                "{:?} should be rejected",
                email
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejection_leaves_no_trace() {
        let (submitter, store, bus) = submitter();
        let mut rx = bus.subscribe(Topic::Submitted).unwrap();

        let _ = submitter.submit("@c", "not-an-email");

        assert!(store.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let (submitter, store, _bus) = submitter();
        let receipt = submitter.submit("  @someChannel  ", " user@example.com ").unwrap();
        let job = store.get(&receipt.job_id).unwrap().unwrap();
        assert_eq!(job.channel, "@someChannel");
        assert_eq!(job.email, "user@example.com");
    }
}
