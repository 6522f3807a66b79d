//! The step abstraction shared by all pipeline stages.

use async_trait::async_trait;

use crate::bus::{PipelineEvent, Topic};

use super::error::StepError;

/// Identity of the request a step is acting for, extracted from its input
/// event before any work happens. Used to address the error event when the
/// step fails.
#[derive(Debug, Clone)]
pub struct Correlation {
    pub job_id: String,
    pub email: String,
}

/// One pipeline stage: consumes events from a single topic, emits the next
/// event on success.
///
/// Steps never publish their own error events. The runner owns failure
/// propagation so that every stage records and notifies the same way.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Step name (for logging).
    fn name(&self) -> &'static str;

    /// The single topic this step consumes.
    fn topic(&self) -> Topic;

    /// Generic user-facing message carried on the error event when the
    /// step fails unexpectedly. Raw causes stay in the job record and logs.
    fn failure_notice(&self) -> &'static str;

    /// Extract the requester identity from the step's input event.
    /// `None` when the event is not this step's input variant.
    fn correlation(&self, event: &PipelineEvent) -> Option<Correlation>;

    /// Build this step's error event.
    fn error_event(&self, correlation: &Correlation, error: Option<String>) -> PipelineEvent;

    /// Do the work. Returns the event to publish next.
    async fn run(&self, event: PipelineEvent) -> Result<PipelineEvent, StepError>;
}
