//! Traincheck Core Library
//!
//! Domain model and collaborator contracts shared by the traincheck
//! assertion oracles: job outcomes, the model-runtime seam, artifact
//! digests, and tracing initialisation.

pub mod domain;
pub mod fakes;
pub mod model;
pub mod telemetry;

pub use domain::{artifact_digest, JobError, JobResult, JobStatus, Result, RunOutcome};
pub use model::{ModelRuntime, ScoringModel};
pub use telemetry::init_tracing;

/// Traincheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
