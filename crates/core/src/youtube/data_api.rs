//! YouTube Data API v3 backend implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::YouTubeConfig;
use crate::job::Video;

use super::types::{ChannelMatch, PlatformError, VideoPlatform};

/// YouTube Data API backend implementation.
pub struct YouTubeDataApi {
    client: Client,
    config: YouTubeConfig,
}

impl YouTubeDataApi {
    /// Create a new client with the given configuration.
    pub fn new(config: YouTubeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the search URL for channel lookup.
    fn build_channel_search_url(&self, query: &str) -> String {
        format!(
            "{}/search?part=snippet&type=channel&q={}&key={}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(query),
            urlencoding::encode(&self.config.api_key)
        )
    }

    /// Build the search URL for a channel's recent videos.
    fn build_video_search_url(&self, channel_id: &str, max_results: u8) -> String {
        format!(
            "{}/search?part=snippet&type=video&order=date&channelId={}&maxResults={}&key={}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(channel_id),
            max_results,
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn get_search(&self, url: &str) -> Result<SearchResponse, PlatformError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout
            } else if e.is_connect() {
                PlatformError::ConnectionFailed(e.to_string())
            } else {
                PlatformError::Api(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeDataApi {
    fn name(&self) -> &str {
        "youtube-data-api"
    }

    async fn search_channels(&self, query: &str) -> Result<Vec<ChannelMatch>, PlatformError> {
        let url = self.build_channel_search_url(query);
        debug!(query = %query, "Searching channels");

        let response = self.get_search(&url).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let channel_id = item.snippet.channel_id?;
                Some(ChannelMatch {
                    channel_id,
                    title: item.snippet.title,
                })
            })
            .collect())
    }

    async fn list_recent_videos(
        &self,
        channel_id: &str,
        max_results: u8,
    ) -> Result<Vec<Video>, PlatformError> {
        let url = self.build_video_search_url(channel_id, max_results);
        debug!(channel_id = %channel_id, max_results = max_results, "Listing recent videos");

        let response = self.get_search(&url).await?;

        let videos: Vec<Video> = response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.and_then(|id| id.video_id)?;
                Some(Video {
                    url: watch_url(&video_id),
                    video_id,
                    title: item.snippet.title,
                    published_at: item.snippet.published_at.as_deref().and_then(parse_published_at),
                    description: item.snippet.description.unwrap_or_default(),
                    thumbnail: item
                        .snippet
                        .thumbnails
                        .and_then(|t| t.high.or(t.medium).or(t.default))
                        .map(|t| t.url)
                        .unwrap_or_default(),
                })
            })
            .collect();

        debug!(channel_id = %channel_id, videos = videos.len(), "Video listing complete");
        Ok(videos)
    }
}

/// Watch URL for a video id.
fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Parse the Data API's publish timestamp.
fn parse_published_at(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Data API response types
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<SearchItemId>,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    description: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn test_config() -> YouTubeConfig {
        YouTubeConfig {
            api_key: "test-key".to_string(),
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_secs: 30,
            max_videos: 5,
        }
    }

    #[test]
    fn test_build_channel_search_url() {
        let api = YouTubeDataApi::new(test_config());
        let url = api.build_channel_search_url("example channel");
        assert!(url.starts_with("https://www.googleapis.com/youtube/v3/search?"));
        assert!(url.contains("type=channel"));
        assert!(url.contains("q=example%20channel"));
        assert!(url.contains("key=test-key"));
    }

    #[test]
    fn test_build_video_search_url() {
        let mut config = test_config();
        config.api_base = "https://www.googleapis.com/youtube/v3/".to_string(); // trailing slash
        let api = YouTubeDataApi::new(config);
        let url = api.build_video_search_url("UC123", 5);
        assert!(url.contains("youtube/v3/search?"));
        assert!(!url.contains("v3//search"));
        assert!(url.contains("type=video"));
        assert!(url.contains("order=date"));
        assert!(url.contains("channelId=UC123"));
        assert!(url.contains("maxResults=5"));
    }

    #[test]
    fn test_parse_published_at() {
        let date = parse_published_at("2024-06-15T10:30:00Z").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);

        assert!(parse_published_at("not a date").is_none());
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_deserialize_channel_search_response() {
        let json = r#"{
            "items": [
                {
                    "id": {"kind": "youtube#channel"},
                    "snippet": {
                        "title": "Example Channel",
                        "channelId": "UC123",
                        "description": "A channel"
                    }
                }
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].snippet.channel_id.as_deref(), Some("UC123"));
    }

    #[test]
    fn test_deserialize_video_search_response() {
        let json = r#"{
            "items": [
                {
                    "id": {"videoId": "vid1"},
                    "snippet": {
                        "title": "First Video",
                        "publishedAt": "2024-06-15T10:30:00Z",
                        "description": "desc",
                        "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/vid1/hqdefault.jpg"}}
                    }
                }
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let item = &response.items[0];
        assert_eq!(item.id.as_ref().unwrap().video_id.as_deref(), Some("vid1"));
        assert_eq!(item.snippet.title, "First Video");
    }

    #[test]
    fn test_deserialize_empty_response() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }
}
