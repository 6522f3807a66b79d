//! Testing utilities and mock implementations for pipeline tests.
//!
//! Mocks cover all three external services so the full pipeline can run
//! end to end without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use titledoctor_core::testing::{fixtures, MockLlm, MockMailer, MockPlatform};
//!
//! let platform = MockPlatform::new();
//! platform.set_channels(vec![fixtures::channel_match("UC1", "Some Channel")]).await;
//! platform.set_videos(vec![fixtures::video("v1", "First Video")]).await;
//!
//! let llm = MockLlm::new();
//! llm.set_response(fixtures::titles_json(1)).await;
//!
//! let mailer = MockMailer::new();
//! // Wire into the pipeline steps...
//! ```

mod mock_llm;
mod mock_mailer;
mod mock_platform;

pub use mock_llm::MockLlm;
pub use mock_mailer::{MockMailer, SentEmail};
pub use mock_platform::MockPlatform;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::job::{ImprovedTitle, Video};
    use crate::youtube::ChannelMatch;

    /// Create a channel match.
    pub fn channel_match(channel_id: &str, title: &str) -> ChannelMatch {
        ChannelMatch {
            channel_id: channel_id.to_string(),
            title: title.to_string(),
        }
    }

    /// Create a video with reasonable defaults.
    pub fn video(video_id: &str, title: &str) -> Video {
        Video {
            video_id: video_id.to_string(),
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            published_at: None,
            description: format!("Description of {}.", title),
            thumbnail: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id),
        }
    }

    /// Create an improved-title suggestion paired with a video.
    pub fn improved_title(original: &str, video_id: &str) -> ImprovedTitle {
        ImprovedTitle {
            original: original.to_string(),
            improved: format!("Better {}", original),
            rationale: "Adds a concrete hook and a searchable keyword.".to_string(),
            url: format!("https://www.youtube.com/watch?v={}", video_id),
        }
    }

    /// A model response with `count` suggestion entries, in input order.
    pub fn titles_json(count: usize) -> String {
        let entries = (0..count)
            .map(|i| {
                format!(
                    r#"{{"original": "Title {i}", "improved": "Improved Title {i}", "rationale": "Rationale {i}."}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(r#"{{"titles": [{}]}}"#, entries)
    }
}
