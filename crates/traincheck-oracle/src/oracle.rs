//! Assertion oracles over completed training jobs.
//!
//! Each oracle is a single-shot, stateless check: a pure function of a job
//! result and a check configuration, returning `Ok(())` or a terminal
//! failure carrying the expected and observed values. Nothing is retried
//! or recovered here; rerunning a job or loosening a tolerance is the
//! calling harness's decision.
//!
//! Every oracle requires `JobStatus::Success` first. A non-success job
//! fails unconditionally — numeric comparison never runs against a failed
//! job.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, info};

use traincheck_core::domain::{artifact_digest, JobError, JobResult};
use traincheck_core::model::{ModelRuntime, ScoringModel};

use crate::compare::{broadcast, compare_close, LengthMismatch};
use crate::config::{
    GeneratedDataCheck, LossBoundCheck, LossCheck, PredictionCheck, WeightCheck,
};
use crate::parse::{parse_predictions_file, parse_weights_file, ParseError};
use crate::registry::{GeneratorRegistry, ResolveError};

/// Output flag under which the trainer writes its readable weight dump.
pub const READABLE_MODEL_FLAG: &str = "--readable_model";

/// Output flag under which the trainer writes per-example predictions.
pub const PREDICTIONS_FLAG: &str = "-p";

/// Output flag under which the trainer writes the binary model artifact.
pub const MODEL_FLAG: &str = "-f";

/// Failures surfaced by the assertion oracles.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("job was not successful (status {status}): {opts}")]
    JobNotSuccessful { status: &'static str, opts: String },

    #[error("job data error: {0}")]
    Job(#[from] JobError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Shape(#[from] LengthMismatch),

    #[error("generator resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("data generator failed: {0}")]
    Generator(#[source] anyhow::Error),

    #[error("model runtime failed: {0}")]
    Model(#[source] anyhow::Error),

    #[error("weights differ beyond tolerance: expected {expected:?}, observed {observed:?}")]
    WeightsMismatch {
        expected: Vec<f64>,
        observed: Vec<f64>,
    },

    #[error(
        "predicted values should be {expected}: {passing} of {total} within tolerance \
         (threshold {threshold}), observed {observed:?}"
    )]
    PredictionMismatch {
        expected: f64,
        observed: Vec<f64>,
        passing: usize,
        total: usize,
        threshold: f64,
    },

    #[error("loss {observed} != expected {expected} at {decimal} decimal places")]
    LossMismatch {
        expected: f64,
        observed: f64,
        decimal: u32,
    },

    #[error("loss {observed} exceeds bound {bound}")]
    LossAboveBound { observed: f64, bound: f64 },

    #[error("generated dataset has no examples: {path}")]
    EmptyDataset { path: String },

    #[error("generated data line has no label separator: {line:?}")]
    MalformedExample { line: String },

    #[error("generated data label is not an integer: {label:?}")]
    InvalidLabel { label: String },

    #[error("accuracy {accuracy} is below threshold {threshold}")]
    AccuracyBelowThreshold { accuracy: f64, threshold: f64 },

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for oracle evaluation.
pub type OracleResult<T> = std::result::Result<T, OracleError>;

fn require_success(job: &JobResult) -> OracleResult<()> {
    if job.succeeded() {
        Ok(())
    } else {
        Err(OracleError::JobNotSuccessful {
            status: job.status.as_str(),
            opts: job.opts.clone(),
        })
    }
}

/// Check the trained weights against the expected sequence, strictly:
/// every weight must be within tolerance.
pub fn evaluate_weights(job: &JobResult, check: &WeightCheck) -> OracleResult<()> {
    require_success(job)?;

    let path = job.output(READABLE_MODEL_FLAG)?;
    let observed = parse_weights_file(path, check.sign_handling())?;
    let verdict = compare_close(&observed, &check.expected_weights, check.tolerance())?;

    info!(
        event = "oracle.weights",
        passed = verdict.all_close(),
        total = verdict.total,
        passing = verdict.passing,
    );

    if !verdict.all_close() {
        return Err(OracleError::WeightsMismatch {
            expected: check.expected_weights.clone(),
            observed,
        });
    }
    Ok(())
}

/// Check the prediction dump against a single expected value broadcast to
/// every prediction, under the majority policy.
pub fn evaluate_prediction(job: &JobResult, check: &PredictionCheck) -> OracleResult<()> {
    require_success(job)?;

    let path = job.output(PREDICTIONS_FLAG)?;
    let observed = parse_predictions_file(path, check.sign_handling())?.flatten()?;
    let expected = broadcast(check.expected_value, observed.len());
    let verdict = compare_close(&observed, &expected, check.tolerance())?;

    info!(
        event = "oracle.prediction",
        passed = verdict.majority_close(check.threshold),
        total = verdict.total,
        passing = verdict.passing,
        threshold = check.threshold,
    );

    if !verdict.majority_close(check.threshold) {
        return Err(OracleError::PredictionMismatch {
            expected: check.expected_value,
            observed,
            passing: verdict.passing,
            total: verdict.total,
            threshold: check.threshold,
        });
    }
    Ok(())
}

fn round_to_scale(value: f64, decimal: u32) -> f64 {
    (value * 10f64.powi(decimal as i32)).round()
}

/// Check the reported loss for equality with the expected loss, both sides
/// rounded to `decimal` places.
pub fn evaluate_loss(job: &JobResult, check: &LossCheck) -> OracleResult<()> {
    require_success(job)?;

    let observed = job.primary()?.finite_loss()?;
    let matches =
        round_to_scale(observed, check.decimal) == round_to_scale(check.expected_loss, check.decimal);

    info!(
        event = "oracle.loss",
        passed = matches,
        observed = observed,
        expected = check.expected_loss,
        decimal = check.decimal,
    );

    if !matches {
        return Err(OracleError::LossMismatch {
            expected: check.expected_loss,
            observed,
            decimal: check.decimal,
        });
    }
    Ok(())
}

/// Check the reported loss against an upper bound (boundary inclusive).
pub fn evaluate_loss_bound(job: &JobResult, check: &LossBoundCheck) -> OracleResult<()> {
    require_success(job)?;

    let observed = job.primary()?.finite_loss()?;
    let within = observed <= check.expected_loss;

    info!(
        event = "oracle.loss_bound",
        passed = within,
        observed = observed,
        bound = check.expected_loss,
    );

    if !within {
        return Err(OracleError::LossAboveBound {
            observed,
            bound: check.expected_loss,
        });
    }
    Ok(())
}

/// Check the trained model's accuracy on freshly generated ground-truth
/// data.
///
/// Loads the job's model artifact through the runtime collaborator,
/// regenerates a labeled dataset through the resolved generator, and
/// re-scores each example with its true label stripped. Predicted and true
/// labels are compared as integers; accuracy is correct / total.
pub fn evaluate_generated_accuracy<R: ModelRuntime>(
    job: &JobResult,
    runtime: &R,
    registry: &GeneratorRegistry,
    check: &GeneratedDataCheck,
) -> OracleResult<()> {
    require_success(job)?;

    let artifact = job.primary()?.artifact(MODEL_FLAG)?;
    let digest = artifact_digest(artifact)?;
    debug!(event = "oracle.model_artifact", path = %artifact.display(), digest = %digest);

    let model = runtime
        .load(artifact, &check.model_options)
        .map_err(OracleError::Model)?;

    let generator = registry.resolve(&check.data_func.name)?;
    let data_path = generator(&check.data_func.params).map_err(OracleError::Generator)?;
    let text = fs::read_to_string(&data_path).map_err(|source| OracleError::Io {
        path: data_path.display().to_string(),
        source,
    })?;

    let mut total = 0usize;
    let mut correct = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (label_part, features) =
            line.split_once('|')
                .ok_or_else(|| OracleError::MalformedExample {
                    line: line.to_string(),
                })?;
        let label: i64 = label_part
            .trim()
            .parse()
            .map_err(|_| OracleError::InvalidLabel {
                label: label_part.trim().to_string(),
            })?;

        let example = format!("|{features}");
        let predicted = model.predict(&example).map_err(OracleError::Model)? as i64;

        if predicted == label {
            correct += 1;
        }
        total += 1;
    }

    if total == 0 {
        return Err(OracleError::EmptyDataset {
            path: data_path.display().to_string(),
        });
    }

    let accuracy = correct as f64 / total as f64;
    info!(
        event = "oracle.generated_accuracy",
        passed = accuracy >= check.accuracy_threshold,
        accuracy = accuracy,
        threshold = check.accuracy_threshold,
        examples = total,
    );

    if accuracy < check.accuracy_threshold {
        return Err(OracleError::AccuracyBelowThreshold {
            accuracy,
            threshold: check.accuracy_threshold,
        });
    }
    Ok(())
}

/// A decoded check configuration, tagged by oracle kind.
///
/// Lets a harness decode one option bag (with a `type` key) and dispatch to
/// the matching oracle through [`evaluate_check`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckSpec {
    Weights(WeightCheck),
    Prediction(PredictionCheck),
    Loss(LossCheck),
    LossBound(LossBoundCheck),
    GeneratedAccuracy(GeneratedDataCheck),
}

/// Collaborators a check dispatch may need.
///
/// Only the generated-accuracy oracle touches the runtime and registry; the
/// others ignore them.
pub struct OracleContext<'a, R: ModelRuntime> {
    pub runtime: &'a R,
    pub registry: &'a GeneratorRegistry,
}

/// Evaluate any [`CheckSpec`] against a job result.
pub fn evaluate_check<R: ModelRuntime>(
    job: &JobResult,
    check: &CheckSpec,
    ctx: &OracleContext<'_, R>,
) -> OracleResult<()> {
    match check {
        CheckSpec::Weights(check) => evaluate_weights(job, check),
        CheckSpec::Prediction(check) => evaluate_prediction(job, check),
        CheckSpec::Loss(check) => evaluate_loss(job, check),
        CheckSpec::LossBound(check) => evaluate_loss_bound(job, check),
        CheckSpec::GeneratedAccuracy(check) => {
            evaluate_generated_accuracy(job, ctx.runtime, ctx.registry, check)
        }
    }
}
