//! Model-runtime collaborator contracts.
//!
//! The accuracy oracle re-scores freshly generated examples through the
//! trained model artifact a job produced. The runtime that loads and drives
//! the model lives outside this workspace; these traits are the seam.
//!
//! Implementations wrap foreign model runtimes, so both traits report
//! failures as `anyhow::Error`.

use std::path::Path;

/// A loaded model that can score one formatted example line.
pub trait ScoringModel {
    /// Produce a single prediction for one example line.
    ///
    /// The line is in the trainer's data format with the true label already
    /// stripped; the returned value is the predicted class/score.
    fn predict(&self, example: &str) -> anyhow::Result<f64>;
}

/// Loads trained model artifacts.
pub trait ModelRuntime {
    /// The model type this runtime produces.
    type Model: ScoringModel;

    /// Load a trained model from an artifact file plus a runtime options
    /// string (e.g. "--quiet").
    fn load(&self, artifact: &Path, options: &str) -> anyhow::Result<Self::Model>;
}
