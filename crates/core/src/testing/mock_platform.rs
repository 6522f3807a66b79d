//! Mock video platform for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::job::Video;
use crate::youtube::{ChannelMatch, PlatformError, VideoPlatform};

/// Mock implementation of the VideoPlatform trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable channel matches and videos
/// - Track search and listing calls for assertions
/// - Simulate failures
#[derive(Default)]
pub struct MockPlatform {
    channels: Arc<RwLock<Vec<ChannelMatch>>>,
    videos: Arc<RwLock<Vec<Video>>>,
    searches: Arc<RwLock<Vec<String>>>,
    listings: Arc<RwLock<Vec<(String, u8)>>>,
    next_error: Arc<RwLock<Option<PlatformError>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel matches returned by subsequent searches.
    pub async fn set_channels(&self, channels: Vec<ChannelMatch>) {
        *self.channels.write().await = channels;
    }

    /// Set the videos returned by subsequent listings.
    pub async fn set_videos(&self, videos: Vec<Video>) {
        *self.videos.write().await = videos;
    }

    /// Configure the next call (search or listing) to fail.
    pub async fn set_next_error(&self, error: PlatformError) {
        *self.next_error.write().await = Some(error);
    }

    /// Queries passed to `search_channels`, in call order.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// `(channel_id, max_results)` pairs passed to `list_recent_videos`.
    pub async fn recorded_listings(&self) -> Vec<(String, u8)> {
        self.listings.read().await.clone()
    }

    async fn take_error(&self) -> Option<PlatformError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_channels(&self, query: &str) -> Result<Vec<ChannelMatch>, PlatformError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.searches.write().await.push(query.to_string());
        Ok(self.channels.read().await.clone())
    }

    async fn list_recent_videos(
        &self,
        channel_id: &str,
        max_results: u8,
    ) -> Result<Vec<Video>, PlatformError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.listings
            .write()
            .await
            .push((channel_id.to_string(), max_results));
        let videos = self.videos.read().await;
        Ok(videos.iter().take(max_results as usize).cloned().collect())
    }
}
