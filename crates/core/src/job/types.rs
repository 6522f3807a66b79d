//! Core job data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status of a job.
///
/// State machine flow:
/// ```text
/// Queued -> ResolvingChannel -> DownloadingVideos -> GeneratingTitles
///        -> SendingEmail -> Completed
///
/// Any non-terminal state can transition to Failed (business-rule
/// non-result) or Error (thrown failure). Both are terminal.
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    /// Job created, waiting for the pipeline to pick it up.
    #[serde(rename = "queued")]
    Queued,

    /// Looking up the channel id for the submitted identifier.
    #[serde(rename = "resolving channel")]
    ResolvingChannel,

    /// Fetching the channel's most recent videos.
    #[serde(rename = "downloading videos")]
    DownloadingVideos,

    /// Asking the language model for improved titles.
    #[serde(rename = "generating optimized titles")]
    GeneratingTitles,

    /// Delivering the report to the requester.
    #[serde(rename = "sending email")]
    SendingEmail,

    /// Report delivered (terminal).
    #[serde(rename = "completed")]
    Completed,

    /// Anticipated non-result, e.g. channel not found (terminal).
    #[serde(rename = "failed")]
    Failed,

    /// Unexpected failure: network, parsing, configuration (terminal).
    #[serde(rename = "error")]
    Error,
}

impl JobStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Error)
    }

    /// Returns the status as its wire string (for logging and filtering).
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::ResolvingChannel => "resolving channel",
            JobStatus::DownloadingVideos => "downloading videos",
            JobStatus::GeneratingTitles => "generating optimized titles",
            JobStatus::SendingEmail => "sending email",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized video record fetched from the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Platform video id.
    pub video_id: String,
    /// Original title as published.
    pub title: String,
    /// Watch URL.
    pub url: String,
    /// Publish timestamp (platform ordering is most recent first).
    pub published_at: Option<DateTime<Utc>>,
    /// Video description.
    pub description: String,
    /// Thumbnail URL.
    pub thumbnail: String,
}

/// An improved title suggestion paired with its source video.
///
/// `improved_titles[i]` always corresponds to `videos[i]`: the `original`
/// and `url` fields are taken from the fetched video, never from model
/// output, so positional correspondence survives whatever the model echoes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedTitle {
    /// The video's original title.
    pub original: String,
    /// The suggested replacement title.
    pub improved: String,
    /// One-to-two-sentence explanation of the improvement.
    pub rationale: String,
    /// Watch URL of the source video.
    pub url: String,
}

/// One end-to-end title-improvement request, tracked by a single
/// identifier through all pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier, `job_<uuid>`, generated at submission.
    pub job_id: String,

    /// Channel identifier as submitted (`@handle` or plain name).
    pub channel: String,

    /// Requester email address.
    pub email: String,

    /// Current pipeline status.
    pub status: JobStatus,

    /// When the job was created. Set once.
    pub created_at: DateTime<Utc>,

    /// When the report was delivered. Set once, only on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Human-readable cause, present only for Failed/Error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Canonical channel id, set by ResolveChannel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// Channel display name, set by ResolveChannel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,

    /// Most recent videos (at most 5), set by FetchVideos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<Video>>,

    /// Suggestions aligned 1:1 with `videos`, set by GenerateTitles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved_titles: Option<Vec<ImprovedTitle>>,

    /// Email-provider delivery id, set by SendEmail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
}

impl Job {
    /// Create a freshly queued job.
    pub fn new(job_id: impl Into<String>, channel: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            channel: channel.into(),
            email: email.into(),
            status: JobStatus::Queued,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
            channel_id: None,
            channel_name: None,
            videos: None,
            improved_titles: None,
            email_id: None,
        }
    }

    /// Apply a patch as a superset merge: fields the patch does not carry
    /// keep their previous value, so no step ever discards what an earlier
    /// step wrote.
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
        if let Some(channel_id) = patch.channel_id {
            self.channel_id = Some(channel_id);
        }
        if let Some(channel_name) = patch.channel_name {
            self.channel_name = Some(channel_name);
        }
        if let Some(videos) = patch.videos {
            self.videos = Some(videos);
        }
        if let Some(improved_titles) = patch.improved_titles {
            self.improved_titles = Some(improved_titles);
        }
        if let Some(email_id) = patch.email_id {
            self.email_id = Some(email_id);
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
    }
}

/// An additive update to a job record.
///
/// Patches are read-modify-written by one step at a time; the pipeline is
/// strictly linear per job, so no locking beyond the store's own is needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub error: Option<String>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub videos: Option<Vec<Video>>,
    pub improved_titles: Option<Vec<ImprovedTitle>>,
    pub email_id: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobPatch {
    /// Patch that only advances the status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch for a terminal failure: sets status and the recorded cause.
    pub fn failure(status: JobStatus, error: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>, channel_name: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self.channel_name = Some(channel_name.into());
        self
    }

    pub fn with_videos(mut self, videos: Vec<Video>) -> Self {
        self.videos = Some(videos);
        self
    }

    pub fn with_improved_titles(mut self, improved_titles: Vec<ImprovedTitle>) -> Self {
        self.improved_titles = Some(improved_titles);
        self
    }

    pub fn with_email_id(mut self, email_id: impl Into<String>) -> Self {
        self.email_id = Some(email_id.into());
        self
    }

    pub fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_video(id: &str, title: &str) -> Video {
        Video {
            video_id: id.to_string(),
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", id),
            published_at: Some(Utc::now()),
            description: "desc".to_string(),
            thumbnail: "https://i.ytimg.com/vi/x/hqdefault.jpg".to_string(),
        }
    }

    #[test]
    fn test_status_wire_strings() {
        let cases = [
            (JobStatus::Queued, "\"queued\""),
            (JobStatus::ResolvingChannel, "\"resolving channel\""),
            (JobStatus::DownloadingVideos, "\"downloading videos\""),
            (JobStatus::GeneratingTitles, "\"generating optimized titles\""),
            (JobStatus::SendingEmail, "\"sending email\""),
            (JobStatus::Completed, "\"completed\""),
            (JobStatus::Failed, "\"failed\""),
            (JobStatus::Error, "\"error\""),
        ];
        for (status, expected) in cases {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::SendingEmail.is_terminal());
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = Job::new("job_1", "@someChannel", "user@example.com");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.error.is_none());
        assert!(job.videos.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_apply_is_additive() {
        let mut job = Job::new("job_1", "@someChannel", "user@example.com");
        job.apply(JobPatch::status(JobStatus::ResolvingChannel).with_channel("UC123", "Some Channel"));

        // A later patch that carries no channel fields must not clear them.
        job.apply(JobPatch::status(JobStatus::DownloadingVideos).with_videos(vec![sample_video("v1", "First")]));

        assert_eq!(job.status, JobStatus::DownloadingVideos);
        assert_eq!(job.channel_id.as_deref(), Some("UC123"));
        assert_eq!(job.channel_name.as_deref(), Some("Some Channel"));
        assert_eq!(job.videos.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_patch_sets_status_and_error() {
        let mut job = Job::new("job_1", "nochannel", "user@example.com");
        job.apply(JobPatch::failure(JobStatus::Failed, "Channel not found"));
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("Channel not found"));
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let job = Job::new("job_1", "@c", "user@example.com");
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["jobId"], "job_1");
        assert_eq!(json["status"], "queued");
        assert!(json.get("createdAt").is_some());
        // Unset accumulated fields are omitted from the wire shape.
        assert!(json.get("channelId").is_none());
        assert!(json.get("improvedTitles").is_none());
    }

    #[test]
    fn test_job_roundtrip() {
        let mut job = Job::new("job_1", "@c", "user@example.com");
        job.apply(
            JobPatch::status(JobStatus::GeneratingTitles)
                .with_channel("UC1", "C")
                .with_videos(vec![sample_video("v1", "First")]),
        );
        let json = serde_json::to_string(&job).unwrap();
        let parsed: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, job);
    }
}
