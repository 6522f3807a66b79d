use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Channel search and video listing credentials. A step needing this
    /// section fails with a configuration error when it is absent.
    #[serde(default)]
    pub youtube: Option<YouTubeConfig>,
    /// Text-generation credentials.
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    /// Transactional email credentials and sender address.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Job store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Store backend for job records.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file path (sqlite backend only).
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("titledoctor.db")
}

/// Available job store backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

/// YouTube Data API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeConfig {
    /// API key for the Data API.
    pub api_key: String,
    /// API base URL (override for testing).
    #[serde(default = "default_youtube_api_base")]
    pub api_base: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Most recent videos fetched per channel (1..=5, default: 5)
    #[serde(default = "default_max_videos")]
    pub max_videos: u8,
}

fn default_youtube_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_max_videos() -> u8 {
    5
}

fn default_timeout() -> u32 {
    30
}

/// Text-generation configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// API key.
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API base URL (override for testing).
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,
    /// Completion token budget (default: 1000)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_llm_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_llm_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

/// Email delivery configuration (Resend)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// API key.
    pub api_key: String,
    /// Sender address reports are delivered from.
    pub from_address: String,
    /// API base URL (override for testing).
    #[serde(default = "default_email_api_base")]
    pub api_base: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_email_api_base() -> String {
    "https://api.resend.com".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<SanitizedYouTubeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<SanitizedEmailConfig>,
}

/// Sanitized YouTube config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedYouTubeConfig {
    pub api_base: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub max_videos: u8,
}

/// Sanitized LLM config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub model: String,
    pub api_base: String,
    pub api_key_configured: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Sanitized email config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEmailConfig {
    pub from_address: String,
    pub api_base: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            youtube: config.youtube.as_ref().map(|y| SanitizedYouTubeConfig {
                api_base: y.api_base.clone(),
                api_key_configured: !y.api_key.is_empty(),
                timeout_secs: y.timeout_secs,
                max_videos: y.max_videos,
            }),
            llm: config.llm.as_ref().map(|l| SanitizedLlmConfig {
                model: l.model.clone(),
                api_base: l.api_base.clone(),
                api_key_configured: !l.api_key.is_empty(),
                max_tokens: l.max_tokens,
                temperature: l.temperature,
            }),
            email: config.email.as_ref().map(|e| SanitizedEmailConfig {
                from_address: e.from_address.clone(),
                api_base: e.api_base.clone(),
                api_key_configured: !e.api_key.is_empty(),
            }),
        }
    }
}
