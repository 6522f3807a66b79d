//! Email delivery abstraction types.

use async_trait::async_trait;
use thiserror::Error;

/// Error type for email delivery.
#[derive(Debug, Error)]
pub enum MailError {
    /// Could not reach the provider.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider returned a non-2xx response.
    #[error("mail API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("failed to parse mail response: {0}")]
    Parse(String),
}

/// External transactional-email capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Provider name (for logging).
    fn provider(&self) -> &str;

    /// Send a plain-text email. Returns the provider's delivery id.
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<String, MailError>;
}
