//! Step failure classification.

use thiserror::Error;

use crate::email::MailError;
use crate::job::JobStoreError;
use crate::titles::{LlmError, OptimizerError};
use crate::youtube::PlatformError;

/// A step failure, classified for the uniform propagation contract.
///
/// Business failures are anticipated non-results: the job becomes
/// `failed` and the recorded reason is shown to the requester as-is.
/// Configuration and operational failures are unexpected: the job becomes
/// `error`, the raw message is recorded, and the error event carries only
/// the step's generic user-facing notice.
#[derive(Debug, Error)]
pub enum StepError {
    /// Anticipated non-result (e.g. channel not found).
    #[error("{reason}")]
    Business {
        /// Recorded in the job's `error` field.
        reason: String,
        /// Optional message carried on the error event.
        notice: Option<String>,
    },

    /// A required credential or setting is absent. Raised before any
    /// external call.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// Network error, malformed response, parse failure.
    #[error("{0}")]
    Operational(String),
}

impl StepError {
    /// Business failure with no extra event message.
    pub fn business(reason: impl Into<String>) -> Self {
        StepError::Business {
            reason: reason.into(),
            notice: None,
        }
    }

    /// Business failure whose error event carries its own message.
    pub fn business_with_notice(reason: impl Into<String>, notice: impl Into<String>) -> Self {
        StepError::Business {
            reason: reason.into(),
            notice: Some(notice.into()),
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, StepError::Business { .. })
    }
}

impl From<PlatformError> for StepError {
    fn from(e: PlatformError) -> Self {
        StepError::Operational(e.to_string())
    }
}

impl From<LlmError> for StepError {
    fn from(e: LlmError) -> Self {
        StepError::Operational(e.to_string())
    }
}

impl From<OptimizerError> for StepError {
    fn from(e: OptimizerError) -> Self {
        StepError::Operational(e.to_string())
    }
}

impl From<MailError> for StepError {
    fn from(e: MailError) -> Self {
        StepError::Operational(e.to_string())
    }
}

impl From<JobStoreError> for StepError {
    fn from(e: JobStoreError) -> Self {
        StepError::Operational(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_classification() {
        let err = StepError::business("Channel not found");
        assert!(err.is_business());
        assert_eq!(err.to_string(), "Channel not found");

        let err = StepError::Operational("connection reset".to_string());
        assert!(!err.is_business());
    }

    #[test]
    fn test_business_notice() {
        let err = StepError::business_with_notice("No videos found", "No videos found for this channel");
        let StepError::Business { notice, .. } = err else {
            panic!("expected business error");
        };
        assert_eq!(notice.as_deref(), Some("No videos found for this channel"));
    }

    #[test]
    fn test_platform_error_is_operational() {
        let err: StepError = PlatformError::Timeout.into();
        assert!(matches!(err, StepError::Operational(_)));
    }
}
