//! Resend transactional-email backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::EmailConfig;

use super::types::{MailError, Mailer};

/// Resend API client.
pub struct ResendMailer {
    client: Client,
    config: EmailConfig,
}

impl ResendMailer {
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SendError {
    error: SendErrorDetail,
}

#[derive(Debug, Deserialize)]
struct SendErrorDetail {
    message: String,
}

#[async_trait]
impl Mailer for ResendMailer {
    fn provider(&self) -> &str {
        "resend"
    }

    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<String, MailError> {
        let request = SendRequest {
            from: &self.config.from_address,
            to: [to],
            subject,
            text,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base.trim_end_matches('/')))
            .header("content-type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Http(e.to_string()))?;

        let status = response.status().as_u16();

        if !(200..300).contains(&status) {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SendError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(MailError::Api { status, message });
        }

        let send_response: SendResponse = response
            .json()
            .await
            .map_err(|e| MailError::Parse(e.to_string()))?;

        debug!(email_id = %send_response.id, "Email accepted by provider");
        Ok(send_response.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_creation() {
        let mailer = ResendMailer::new(EmailConfig {
            api_key: "key".to_string(),
            from_address: "reports@titledoctor.dev".to_string(),
            api_base: "https://api.resend.com".to_string(),
            timeout_secs: 30,
        });
        assert_eq!(mailer.provider(), "resend");
    }

    #[test]
    fn test_send_request_serialization() {
        let request = SendRequest {
            from: "reports@titledoctor.dev",
            to: ["user@example.com"],
            subject: "Subject",
            text: "Body",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "reports@titledoctor.dev");
        assert_eq!(json["to"][0], "user@example.com");
        assert_eq!(json["text"], "Body");
    }

    #[test]
    fn test_send_response_deserialization() {
        let response: SendResponse = serde_json::from_str(r#"{"id": "re_abc123"}"#).unwrap();
        assert_eq!(response.id, "re_abc123");
    }

    #[test]
    fn test_send_error_deserialization() {
        let json = r#"{"error": {"message": "Invalid from address", "name": "validation_error"}}"#;
        let error: SendError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error.message, "Invalid from address");
    }
}
