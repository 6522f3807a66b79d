//! Named-topic event bus connecting pipeline steps.
//!
//! Each topic has at most one subscriber; publishing to a topic nobody
//! subscribes to drops the event. Delivery order is guaranteed per topic
//! but not across jobs.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::job::{ImprovedTitle, Video};

/// Error type for bus operations.
#[derive(Debug, Error)]
pub enum BusError {
    /// A second handler tried to subscribe to an already-claimed topic.
    #[error("topic already subscribed: {0}")]
    AlreadySubscribed(Topic),
}

/// Named event channels, one producing step to one consuming step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Submit accepted a request.
    Submitted,
    /// ResolveChannel found the canonical channel.
    ChannelResolved,
    /// ResolveChannel terminated the job.
    ChannelError,
    /// FetchVideos collected the recent videos.
    VideosFetched,
    /// FetchVideos terminated the job.
    VideosError,
    /// GenerateTitles produced aligned suggestions.
    TitlesReady,
    /// GenerateTitles terminated the job.
    TitlesError,
    /// SendEmail delivered the report (terminal success).
    EmailSent,
    /// SendEmail terminated the job.
    EmailError,
}

impl Topic {
    /// Wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Submitted => "yt.submit",
            Topic::ChannelResolved => "yt.channel.resolved",
            Topic::ChannelError => "yt.channel.error",
            Topic::VideosFetched => "yt.videos.fetched",
            Topic::VideosError => "yt.videos.error",
            Topic::TitlesReady => "yt.titles.ready",
            Topic::TitlesError => "yt.titles.error",
            Topic::EmailSent => "yt.email.sent",
            Topic::EmailError => "yt.email.error",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event payload per topic, tagged by variant.
///
/// Steps validate the variant at handler entry and fail fast on a
/// mismatch instead of propagating missing fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "topic", content = "data", rename_all = "snake_case")]
pub enum PipelineEvent {
    #[serde(rename_all = "camelCase")]
    Submitted {
        job_id: String,
        channel: String,
        email: String,
    },

    #[serde(rename_all = "camelCase")]
    ChannelResolved {
        job_id: String,
        email: String,
        channel_id: String,
        channel_name: String,
    },

    #[serde(rename_all = "camelCase")]
    ChannelError {
        job_id: String,
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    VideosFetched {
        job_id: String,
        email: String,
        channel_name: String,
        videos: Vec<Video>,
    },

    #[serde(rename_all = "camelCase")]
    VideosError {
        job_id: String,
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    TitlesReady {
        job_id: String,
        email: String,
        channel_name: String,
        improved_titles: Vec<ImprovedTitle>,
    },

    #[serde(rename_all = "camelCase")]
    TitlesError {
        job_id: String,
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    EmailSent {
        job_id: String,
        email: String,
        email_id: String,
        completed_at: DateTime<Utc>,
    },

    /// No email address here: nothing subscribes past this stage.
    #[serde(rename_all = "camelCase")]
    EmailError {
        job_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl PipelineEvent {
    /// The topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            PipelineEvent::Submitted { .. } => Topic::Submitted,
            PipelineEvent::ChannelResolved { .. } => Topic::ChannelResolved,
            PipelineEvent::ChannelError { .. } => Topic::ChannelError,
            PipelineEvent::VideosFetched { .. } => Topic::VideosFetched,
            PipelineEvent::VideosError { .. } => Topic::VideosError,
            PipelineEvent::TitlesReady { .. } => Topic::TitlesReady,
            PipelineEvent::TitlesError { .. } => Topic::TitlesError,
            PipelineEvent::EmailSent { .. } => Topic::EmailSent,
            PipelineEvent::EmailError { .. } => Topic::EmailError,
        }
    }

    /// Correlation id threaded through every payload.
    pub fn job_id(&self) -> &str {
        match self {
            PipelineEvent::Submitted { job_id, .. }
            | PipelineEvent::ChannelResolved { job_id, .. }
            | PipelineEvent::ChannelError { job_id, .. }
            | PipelineEvent::VideosFetched { job_id, .. }
            | PipelineEvent::VideosError { job_id, .. }
            | PipelineEvent::TitlesReady { job_id, .. }
            | PipelineEvent::TitlesError { job_id, .. }
            | PipelineEvent::EmailSent { job_id, .. }
            | PipelineEvent::EmailError { job_id, .. } => job_id,
        }
    }
}

/// In-process publish/subscribe bus.
///
/// Producers never block: channels are unbounded, matching the design's
/// lack of backpressure across jobs.
#[derive(Debug, Default)]
pub struct EventBus {
    senders: Mutex<HashMap<Topic, mpsc::UnboundedSender<PipelineEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a topic. Exactly one subscriber per topic; a second claim
    /// is an error rather than fan-out.
    pub fn subscribe(&self, topic: Topic) -> Result<mpsc::UnboundedReceiver<PipelineEvent>, BusError> {
        let mut senders = self.senders.lock().expect("bus map poisoned");
        if senders.contains_key(&topic) {
            return Err(BusError::AlreadySubscribed(topic));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        senders.insert(topic, tx);
        Ok(rx)
    }

    /// Publish an event to its topic's subscriber, if any.
    ///
    /// Events on unclaimed topics are dropped; terminal error topics have
    /// no consumer by design.
    pub fn publish(&self, event: PipelineEvent) {
        let topic = event.topic();
        let senders = self.senders.lock().expect("bus map poisoned");
        match senders.get(&topic) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    debug!(topic = %topic, "Subscriber gone, event dropped");
                }
            }
            None => {
                debug!(topic = %topic, "No subscriber, event dropped");
            }
        }
    }
}
