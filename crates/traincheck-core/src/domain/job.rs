//! Training job outcomes and per-run sub-results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::error::{JobError, Result};

/// Terminal status of an executed training/prediction job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Success,
    Failed,
    Cancelled,
    TimedOut,
}

impl JobStatus {
    /// Status name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Success => "SUCCESS",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::TimedOut => "TIMEDOUT",
        }
    }
}

/// Sub-result of a single run within a job.
///
/// A job may execute the trainer more than once (e.g. train then re-score);
/// each execution contributes one `RunOutcome` with its reported loss and the
/// model artifacts it produced, keyed by the output flag that requested them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunOutcome {
    /// Final loss reported by the trainer (absent when the run produced none).
    pub loss: Option<f64>,

    /// Artifact files produced by this run, keyed by output flag (e.g. "-f").
    pub artifacts: BTreeMap<String, PathBuf>,
}

impl RunOutcome {
    /// Create an empty run outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reported loss.
    pub fn with_loss(mut self, loss: f64) -> Self {
        self.loss = Some(loss);
        self
    }

    /// Register an artifact file under its output flag.
    pub fn with_artifact(mut self, flag: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.artifacts.insert(flag.into(), path.into());
        self
    }

    /// Path of the artifact produced for `flag`.
    pub fn artifact(&self, flag: &str) -> Result<&Path> {
        self.artifacts
            .get(flag)
            .map(PathBuf::as_path)
            .ok_or_else(|| JobError::MissingArtifact {
                flag: flag.to_string(),
            })
    }

    /// The reported loss, required to be a real (finite) number.
    pub fn finite_loss(&self) -> Result<f64> {
        match self.loss {
            None => Err(JobError::MissingLoss),
            Some(value) if !value.is_finite() => Err(JobError::NonFiniteLoss { value }),
            Some(value) => Ok(value),
        }
    }
}

/// Outcome of one executed training/prediction job.
///
/// Produced entirely by the job-execution collaborator; oracles only read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobResult {
    /// Unique identifier for this job.
    pub job_id: Uuid,

    /// Trainer invocation line, kept for diagnostics.
    pub opts: String,

    /// Terminal status.
    pub status: JobStatus,

    /// Output files, keyed by output-flag name (e.g. "-p", "--readable_model").
    pub outputs: BTreeMap<String, Vec<PathBuf>>,

    /// Per-run sub-results in execution order.
    pub runs: Vec<RunOutcome>,

    /// When execution started.
    pub started_at: DateTime<Utc>,

    /// When execution finished (None if the producer never finalized).
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobResult {
    /// Create a new job result.
    pub fn new(opts: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            opts: opts.into(),
            status,
            outputs: BTreeMap::new(),
            runs: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append an output file under its flag.
    pub fn with_output(mut self, flag: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.outputs.entry(flag.into()).or_default().push(path.into());
        self
    }

    /// Append a run sub-result.
    pub fn with_run(mut self, run: RunOutcome) -> Self {
        self.runs.push(run);
        self
    }

    /// Mark the job finished now.
    pub fn finished(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Whether the job terminated successfully.
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Success
    }

    /// First output file registered under `flag`.
    pub fn output(&self, flag: &str) -> Result<&Path> {
        self.outputs
            .get(flag)
            .and_then(|paths| paths.first())
            .map(PathBuf::as_path)
            .ok_or_else(|| JobError::MissingOutput {
                flag: flag.to_string(),
            })
    }

    /// The first run sub-result.
    pub fn primary(&self) -> Result<&RunOutcome> {
        self.runs.first().ok_or(JobError::NoRuns)
    }
}
