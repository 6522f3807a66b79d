//! Title optimization: prompt construction and response pairing.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::job::{ImprovedTitle, Video};

use super::llm::{complete_json, CompletionRequest, LlmClient, LlmError};

/// Upper bound on titles per request. The video fetch cap is validated
/// against it, so one model call always covers a whole job.
pub const MAX_TITLES: usize = 5;

/// Error type for title optimization.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model returned a different number of suggestions than input
    /// titles. Truncating silently would break positional alignment, so
    /// this is a hard failure.
    #[error("model returned {got} titles for {expected} videos")]
    CountMismatch { expected: usize, got: usize },
}

/// Expected response shape from the model.
#[derive(Debug, Deserialize)]
pub struct TitleSuggestions {
    pub titles: Vec<TitleSuggestion>,
}

/// One suggestion as returned by the model.
#[derive(Debug, Deserialize)]
pub struct TitleSuggestion {
    #[allow(dead_code)]
    pub original: String,
    pub improved: String,
    pub rationale: String,
}

/// Generates improved titles for a batch of videos through an LLM.
pub struct TitleOptimizer {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
    temperature: f32,
}

impl TitleOptimizer {
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            llm,
            max_tokens,
            temperature,
        }
    }

    /// Ask the model for improved titles, one per input video, aligned by
    /// position.
    pub async fn improve(
        &self,
        channel_name: &str,
        videos: &[Video],
    ) -> Result<Vec<ImprovedTitle>, OptimizerError> {
        let request = CompletionRequest::new(build_prompt(channel_name, videos))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        debug!(
            provider = self.llm.provider(),
            model = self.llm.model(),
            titles = videos.len(),
            "Requesting improved titles"
        );

        let suggestions: TitleSuggestions = complete_json(self.llm.as_ref(), request).await?;
        pair_with_videos(videos, suggestions)
    }
}

/// System prompt fixing the model's role.
pub const SYSTEM_PROMPT: &str =
    "You are a YouTube SEO and engagement expert who helps creators write better video titles.";

/// Build the single prompt enumerating all input titles.
pub fn build_prompt(channel_name: &str, videos: &[Video]) -> String {
    let video_titles = videos
        .iter()
        .enumerate()
        .map(|(idx, v)| format!("{}. \"{}\"", idx + 1, v.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Below are {count} video titles from the channel "{channel}".
For each title, provide:
1. An improved version that is more engaging, SEO-friendly, and likely to get more clicks
2. A brief rationale (one or two sentences) explaining why the improved version is better

Guidelines:
- Keep the core topic and authenticity
- Use action verbs, numbers, and specific value propositions
- Make it curiosity-inducing without being clickbait
- Optimize for searchability and clarity

Video titles:
{titles}

Respond in JSON format:
{{
  "titles": [
    {{
      "original": "...",
      "improved": "...",
      "rationale": "..."
    }}
  ]
}}

Return exactly {count} entries in the same order as the input."#,
        count = videos.len(),
        channel = channel_name,
        titles = video_titles,
    )
}

/// Pair model output with the input videos by position.
///
/// Entry `i` maps to `videos[i]` regardless of what the model echoed in
/// its `original` field; the stored original title and URL always come
/// from the fetched video.
pub fn pair_with_videos(
    videos: &[Video],
    suggestions: TitleSuggestions,
) -> Result<Vec<ImprovedTitle>, OptimizerError> {
    if suggestions.titles.len() != videos.len() {
        return Err(OptimizerError::CountMismatch {
            expected: videos.len(),
            got: suggestions.titles.len(),
        });
    }

    Ok(videos
        .iter()
        .zip(suggestions.titles)
        .map(|(video, suggestion)| ImprovedTitle {
            original: video.title.clone(),
            improved: suggestion.improved,
            rationale: suggestion.rationale,
            url: video.url.clone(),
        })
        .collect())
}
