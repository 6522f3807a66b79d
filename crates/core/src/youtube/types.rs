//! Video platform abstraction types.

use async_trait::async_trait;
use thiserror::Error;

use crate::job::Video;

/// Error type for platform lookups.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Request timed out.
    #[error("platform request timed out")]
    Timeout,

    /// Could not reach the platform.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Platform returned an error response.
    #[error("platform API error: {0}")]
    Api(String),

    /// Response body did not match the expected shape.
    #[error("failed to parse platform response: {0}")]
    Parse(String),
}

/// A channel matching a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMatch {
    /// Canonical channel id.
    pub channel_id: String,
    /// Display name.
    pub title: String,
}

/// External channel-search and video-listing capability.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Search channels by handle or name text. The first result is
    /// treated as canonical by the caller.
    async fn search_channels(&self, query: &str) -> Result<Vec<ChannelMatch>, PlatformError>;

    /// List a channel's most recent videos, newest first, capped at
    /// `max_results`.
    async fn list_recent_videos(
        &self,
        channel_id: &str,
        max_results: u8,
    ) -> Result<Vec<Video>, PlatformError>;
}
