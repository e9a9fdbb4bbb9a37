//! Domain models for traincheck.
//!
//! Canonical definitions for the core entities:
//! - `JobResult`: outcome of one executed training/prediction job
//! - `RunOutcome`: per-run sub-result with loss and artifacts
//! - `JobError`: error taxonomy for job-result access

pub mod digest;
pub mod error;
pub mod job;

// Re-export main types and errors
pub use digest::artifact_digest;
pub use error::{JobError, Result};
pub use job::{JobResult, JobStatus, RunOutcome};
