//! Job records and their persistence.
//!
//! A `Job` is one end-to-end title-improvement request. Steps mutate it
//! through additive `JobPatch` merges against a `JobStore` with plain
//! get/set semantics.

pub mod memory;
pub mod sqlite;
mod store;
mod types;

pub use memory::InMemoryJobStore;
pub use sqlite::SqliteJobStore;
pub use store::{apply_patch, JobStore, JobStoreError};
pub use types::{ImprovedTitle, Job, JobPatch, JobStatus, Video};
