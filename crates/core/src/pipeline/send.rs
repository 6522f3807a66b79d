//! SendEmail step: deliver the report and complete the job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::bus::{PipelineEvent, Topic};
use crate::email::{report, Mailer};
use crate::job::{apply_patch, JobPatch, JobStatus, JobStore};

use super::error::StepError;
use super::step::{Correlation, PipelineStep};

/// Renders the report and emails it to the requester. The only step that
/// moves a job to `completed`.
pub struct SendEmailStep {
    store: Arc<dyn JobStore>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl SendEmailStep {
    pub fn new(store: Arc<dyn JobStore>, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { store, mailer }
    }
}

#[async_trait]
impl PipelineStep for SendEmailStep {
    fn name(&self) -> &'static str {
        "send-email"
    }

    fn topic(&self) -> Topic {
        Topic::TitlesReady
    }

    fn failure_notice(&self) -> &'static str {
        "Failed to send email. Please try again later."
    }

    fn correlation(&self, event: &PipelineEvent) -> Option<Correlation> {
        let PipelineEvent::TitlesReady { job_id, email, .. } = event else {
            return None;
        };
        Some(Correlation {
            job_id: job_id.clone(),
            email: email.clone(),
        })
    }

    fn error_event(&self, correlation: &Correlation, error: Option<String>) -> PipelineEvent {
        PipelineEvent::EmailError {
            job_id: correlation.job_id.clone(),
            error,
        }
    }

    async fn run(&self, event: PipelineEvent) -> Result<PipelineEvent, StepError> {
        let (job_id, email, channel_name, improved_titles) = match event {
            PipelineEvent::TitlesReady {
                job_id,
                email,
                channel_name,
                improved_titles,
            } => (job_id, email, channel_name, improved_titles),
            other => {
                return Err(StepError::Operational(format!(
                    "unexpected event on {}",
                    other.topic()
                )))
            }
        };

        apply_patch(
            self.store.as_ref(),
            &job_id,
            JobPatch::status(JobStatus::SendingEmail),
        )?;

        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| StepError::Configuration("Resend API key not configured".to_string()))?;

        let subject = report::subject(&channel_name);
        let body = report::render(&channel_name, &improved_titles);
        let email_id = mailer.send(&email, &subject, &body).await?;
        let completed_at = Utc::now();

        info!(
            job_id = %job_id,
            email_id = %email_id,
            "Report delivered, job completed"
        );

        apply_patch(
            self.store.as_ref(),
            &job_id,
            JobPatch::status(JobStatus::Completed)
                .with_email_id(&email_id)
                .with_completed_at(completed_at),
        )?;

        Ok(PipelineEvent::EmailSent {
            job_id,
            email,
            email_id,
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::MailError;
    use crate::job::{ImprovedTitle, InMemoryJobStore, Job};
    use crate::testing::MockMailer;

    fn improved(original: &str) -> ImprovedTitle {
        ImprovedTitle {
            original: original.to_string(),
            improved: format!("Better {}", original),
            rationale: "More specific.".to_string(),
            url: "https://www.youtube.com/watch?v=v1".to_string(),
        }
    }

    fn ready(job_id: &str) -> PipelineEvent {
        PipelineEvent::TitlesReady {
            job_id: job_id.to_string(),
            email: "user@example.com".to_string(),
            channel_name: "Some Channel".to_string(),
            improved_titles: vec![improved("First")],
        }
    }

    fn seeded_store(job_id: &str) -> Arc<InMemoryJobStore> {
        let store = Arc::new(InMemoryJobStore::new());
        store.set(&Job::new(job_id, "@c", "user@example.com")).unwrap();
        store
    }

    #[tokio::test]
    async fn test_sends_report_and_completes_job() {
        let store = seeded_store("job_1");
        let mailer = Arc::new(MockMailer::new());
        mailer.set_email_id("re_123").await;

        let step = SendEmailStep::new(store.clone(), Some(mailer.clone()));
        let next = step.run(ready("job_1")).await.unwrap();

        let PipelineEvent::EmailSent { email_id, .. } = next else {
            panic!("expected EmailSent");
        };
        assert_eq!(email_id, "re_123");

        let job = store.get("job_1").unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.email_id.as_deref(), Some("re_123"));
        assert!(job.completed_at.is_some());

        let sent = mailer.recorded_sends().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
        assert_eq!(sent[0].subject, "Title Doctor - Improved Titles for Some Channel");
        assert!(sent[0].text.contains("Original: First"));
    }

    #[tokio::test]
    async fn test_missing_mailer_is_configuration_failure() {
        let store = seeded_store("job_1");
        let step = SendEmailStep::new(store.clone(), None);

        let err = step.run(ready("job_1")).await.unwrap_err();
        assert!(matches!(err, StepError::Configuration(_)));

        // No delivery fields on the job.
        let job = store.get("job_1").unwrap().unwrap();
        assert!(job.email_id.is_none());
        assert!(job.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_provider_rejection_is_operational() {
        let store = seeded_store("job_1");
        let mailer = Arc::new(MockMailer::new());
        mailer
            .set_next_error(MailError::Api {
                status: 422,
                message: "invalid from".to_string(),
            })
            .await;

        let step = SendEmailStep::new(store.clone(), Some(mailer));
        let err = step.run(ready("job_1")).await.unwrap_err();
        assert!(matches!(err, StepError::Operational(_)));

        let job = store.get("job_1").unwrap().unwrap();
        assert!(job.email_id.is_none());
        assert!(job.completed_at.is_none());
    }
}
