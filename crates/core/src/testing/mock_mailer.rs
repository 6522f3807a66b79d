//! Mock mailer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::email::{MailError, Mailer};

/// A delivered email as recorded by the mock.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Mock implementation of the Mailer trait.
///
/// Records every send and returns a configurable delivery id.
pub struct MockMailer {
    email_id: Arc<RwLock<String>>,
    sends: Arc<RwLock<Vec<SentEmail>>>,
    next_error: Arc<RwLock<Option<MailError>>>,
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            email_id: Arc::new(RwLock::new("mock-email-id".to_string())),
            sends: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the delivery id returned by subsequent sends.
    pub async fn set_email_id(&self, email_id: impl Into<String>) {
        *self.email_id.write().await = email_id.into();
    }

    /// Configure the next send to fail.
    pub async fn set_next_error(&self, error: MailError) {
        *self.next_error.write().await = Some(error);
    }

    /// Emails passed to `send`, in call order.
    pub async fn recorded_sends(&self) -> Vec<SentEmail> {
        self.sends.read().await.clone()
    }

    /// Number of sends performed.
    pub async fn send_count(&self) -> usize {
        self.sends.read().await.len()
    }

    async fn take_error(&self) -> Option<MailError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<String, MailError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.sends.write().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
        });
        Ok(self.email_id.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_sends() {
        let mailer = MockMailer::new();
        mailer.set_email_id("re_1").await;

        let id = mailer.send("user@example.com", "Subject", "Body").await.unwrap();
        assert_eq!(id, "re_1");

        let sends = mailer.recorded_sends().await;
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].to, "user@example.com");
        assert_eq!(sends[0].subject, "Subject");
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let mailer = MockMailer::new();
        mailer
            .set_next_error(MailError::Http("connection refused".to_string()))
            .await;

        assert!(mailer.send("a@b.c", "s", "t").await.is_err());
        assert!(mailer.send("a@b.c", "s", "t").await.is_ok());
        assert_eq!(mailer.send_count().await, 1);
    }
}
