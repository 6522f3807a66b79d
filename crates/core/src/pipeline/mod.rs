//! The title-improvement pipeline.
//!
//! Five stages connected by bus topics:
//! Submit -> ResolveChannel -> FetchVideos -> GenerateTitles -> SendEmail.
//! Each stage consumes exactly one topic and emits the next success event,
//! or its error event through the runner's uniform failure handling.

mod error;
mod fetch;
mod generate;
mod resolve;
mod runner;
mod send;
mod step;
mod submit;

pub use error::StepError;
pub use fetch::FetchVideosStep;
pub use generate::GenerateTitlesStep;
pub use resolve::ResolveChannelStep;
pub use runner::{handle_event, PipelineRunner};
pub use send::SendEmailStep;
pub use step::{Correlation, PipelineStep};
pub use submit::{SubmitError, SubmitReceipt, Submitter};
