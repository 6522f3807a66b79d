//! Title generation through a language model.

mod llm;
mod optimizer;

pub use llm::{complete_json, CompletionRequest, LlmClient, LlmError, OpenAiClient};
pub use optimizer::{
    build_prompt, pair_with_videos, OptimizerError, TitleOptimizer, TitleSuggestion,
    TitleSuggestions, MAX_TITLES, SYSTEM_PROMPT,
};
