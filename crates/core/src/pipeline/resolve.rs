//! ResolveChannel step: submitted identifier to canonical channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::bus::{PipelineEvent, Topic};
use crate::job::{apply_patch, JobPatch, JobStatus, JobStore};
use crate::youtube::VideoPlatform;

use super::error::StepError;
use super::step::{Correlation, PipelineStep};

/// Resolves the submitted channel handle or name to a canonical channel id.
/// The platform's first search result wins.
pub struct ResolveChannelStep {
    store: Arc<dyn JobStore>,
    platform: Option<Arc<dyn VideoPlatform>>,
}

impl ResolveChannelStep {
    pub fn new(store: Arc<dyn JobStore>, platform: Option<Arc<dyn VideoPlatform>>) -> Self {
        Self { store, platform }
    }
}

#[async_trait]
impl PipelineStep for ResolveChannelStep {
    fn name(&self) -> &'static str {
        "resolve-channel"
    }

    fn topic(&self) -> Topic {
        Topic::Submitted
    }

    fn failure_notice(&self) -> &'static str {
        "Failed to resolve channel. Please try again."
    }

    fn correlation(&self, event: &PipelineEvent) -> Option<Correlation> {
        let PipelineEvent::Submitted { job_id, email, .. } = event else {
            return None;
        };
        Some(Correlation {
            job_id: job_id.clone(),
            email: email.clone(),
        })
    }

    fn error_event(&self, correlation: &Correlation, error: Option<String>) -> PipelineEvent {
        PipelineEvent::ChannelError {
            job_id: correlation.job_id.clone(),
            email: correlation.email.clone(),
            error,
        }
    }

    async fn run(&self, event: PipelineEvent) -> Result<PipelineEvent, StepError> {
        let (job_id, channel, email) = match event {
            PipelineEvent::Submitted { job_id, channel, email } => (job_id, channel, email),
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
            JobPatch::status(JobStatus::ResolvingChannel),
        )?;

        let platform = self
            .platform
            .as_ref()
            .ok_or_else(|| StepError::Configuration("YouTube API key not configured".to_string()))?;

        // Handles are searched by their bare name.
        let query = channel.trim_start_matches('@');
        let matches = platform.search_channels(query).await?;

        let Some(best) = matches.into_iter().next() else {
            return Err(StepError::business("Channel not found"));
        };

        info!(
            job_id = %job_id,
            channel_id = %best.channel_id,
            channel_name = %best.title,
            "Channel resolved"
        );

        apply_patch(
            self.store.as_ref(),
            &job_id,
            JobPatch::default().with_channel(&best.channel_id, &best.title),
        )?;

        Ok(PipelineEvent::ChannelResolved {
            job_id,
            email,
            channel_id: best.channel_id,
            channel_name: best.title,
        })
    }
}
