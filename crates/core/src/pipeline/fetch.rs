//! FetchVideos step: collect the channel's most recent uploads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::bus::{PipelineEvent, Topic};
use crate::job::{apply_patch, JobPatch, JobStatus, JobStore};
use crate::youtube::VideoPlatform;

use super::error::StepError;
use super::step::{Correlation, PipelineStep};

/// Fetches the resolved channel's most recent videos, newest first.
pub struct FetchVideosStep {
    store: Arc<dyn JobStore>,
    platform: Option<Arc<dyn VideoPlatform>>,
    max_videos: u8,
}

impl FetchVideosStep {
    pub fn new(
        store: Arc<dyn JobStore>,
        platform: Option<Arc<dyn VideoPlatform>>,
        max_videos: u8,
    ) -> Self {
        Self {
            store,
            platform,
            max_videos,
        }
    }
}

#[async_trait]
impl PipelineStep for FetchVideosStep {
    fn name(&self) -> &'static str {
        "fetch-videos"
    }

    fn topic(&self) -> Topic {
        Topic::ChannelResolved
    }

    fn failure_notice(&self) -> &'static str {
        "Failed to fetch videos. Please try again."
    }

    fn correlation(&self, event: &PipelineEvent) -> Option<Correlation> {
        let PipelineEvent::ChannelResolved { job_id, email, .. } = event else {
            return None;
        };
        Some(Correlation {
            job_id: job_id.clone(),
            email: email.clone(),
        })
    }

    fn error_event(&self, correlation: &Correlation, error: Option<String>) -> PipelineEvent {
        PipelineEvent::VideosError {
            job_id: correlation.job_id.clone(),
            email: correlation.email.clone(),
            error,
        }
    }

    async fn run(&self, event: PipelineEvent) -> Result<PipelineEvent, StepError> {
        let (job_id, email, channel_id, channel_name) = match event {
            PipelineEvent::ChannelResolved {
                job_id,
                email,
                channel_id,
                channel_name,
            } => (job_id, email, channel_id, channel_name),
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
            JobPatch::status(JobStatus::DownloadingVideos),
        )?;

        let platform = self
            .platform
            .as_ref()
            .ok_or_else(|| StepError::Configuration("YouTube API key not configured".to_string()))?;

        let videos = platform.list_recent_videos(&channel_id, self.max_videos).await?;

        if videos.is_empty() {
            return Err(StepError::business_with_notice(
                "No videos found",
                "No videos found for this channel",
            ));
        }

        info!(
            job_id = %job_id,
            channel_id = %channel_id,
            videos = videos.len(),
            "Videos fetched"
        );

        apply_patch(
            self.store.as_ref(),
            &job_id,
            JobPatch::default().with_videos(videos.clone()),
        )?;

        Ok(PipelineEvent::VideosFetched {
            job_id,
            email,
            channel_name,
            videos,
        })
    }
}
