pub mod bus;
pub mod config;
pub mod email;
pub mod job;
pub mod pipeline;
pub mod testing;
pub mod titles;
pub mod youtube;

pub use bus::{EventBus, PipelineEvent, Topic};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig};
pub use job::{Job, JobStatus, JobStore};
pub use pipeline::{PipelineRunner, SubmitReceipt, Submitter};
