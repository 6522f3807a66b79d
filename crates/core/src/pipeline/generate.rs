//! GenerateTitles step: improved titles for the fetched videos.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::bus::{PipelineEvent, Topic};
use crate::job::{apply_patch, JobPatch, JobStatus, JobStore};
use crate::titles::TitleOptimizer;

use super::error::StepError;
use super::step::{Correlation, PipelineStep};

/// Asks the language model for one improved title per fetched video.
pub struct GenerateTitlesStep {
    store: Arc<dyn JobStore>,
    optimizer: Option<Arc<TitleOptimizer>>,
}

impl GenerateTitlesStep {
    pub fn new(store: Arc<dyn JobStore>, optimizer: Option<Arc<TitleOptimizer>>) -> Self {
        Self { store, optimizer }
    }
}

#[async_trait]
impl PipelineStep for GenerateTitlesStep {
    fn name(&self) -> &'static str {
        "generate-titles"
    }

    fn topic(&self) -> Topic {
        Topic::VideosFetched
    }

    fn failure_notice(&self) -> &'static str {
        "Failed to generate improved titles for videos. Please try again later."
    }

    fn correlation(&self, event: &PipelineEvent) -> Option<Correlation> {
        let PipelineEvent::VideosFetched { job_id, email, .. } = event else {
            return None;
        };
        Some(Correlation {
            job_id: job_id.clone(),
            email: email.clone(),
        })
    }

    fn error_event(&self, correlation: &Correlation, error: Option<String>) -> PipelineEvent {
        PipelineEvent::TitlesError {
            job_id: correlation.job_id.clone(),
            email: correlation.email.clone(),
            error,
        }
    }

    async fn run(&self, event: PipelineEvent) -> Result<PipelineEvent, StepError> {
        let (job_id, email, channel_name, videos) = match event {
            PipelineEvent::VideosFetched {
                job_id,
                email,
                channel_name,
                videos,
            } => (job_id, email, channel_name, videos),
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
            JobPatch::status(JobStatus::GeneratingTitles),
        )?;

        let optimizer = self
            .optimizer
            .as_ref()
            .ok_or_else(|| StepError::Configuration("OpenAI API key not configured".to_string()))?;

        let improved_titles = optimizer.improve(&channel_name, &videos).await?;

        info!(
            job_id = %job_id,
            titles = improved_titles.len(),
            "Improved titles generated"
        );

        apply_patch(
            self.store.as_ref(),
            &job_id,
            JobPatch::default().with_improved_titles(improved_titles.clone()),
        )?;

        Ok(PipelineEvent::TitlesReady {
            job_id,
            email,
            channel_name,
            improved_titles,
        })
    }
}
