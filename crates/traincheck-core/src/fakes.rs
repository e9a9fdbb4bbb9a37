//! In-memory fakes for the model-runtime traits (testing only)
//!
//! Provides `FixedModel` and `FixedRuntime` that satisfy the trait contracts
//! without a real model runtime.

use std::path::Path;

use crate::model::{ModelRuntime, ScoringModel};

/// A model that predicts the same value for every example.
#[derive(Debug, Clone, Copy)]
pub struct FixedModel {
    prediction: f64,
}

impl ScoringModel for FixedModel {
    fn predict(&self, _example: &str) -> anyhow::Result<f64> {
        Ok(self.prediction)
    }
}

/// A runtime that loads a `FixedModel` after checking the artifact exists.
#[derive(Debug, Clone, Copy)]
pub struct FixedRuntime {
    /// Value every loaded model will predict.
    pub prediction: f64,
}

impl FixedRuntime {
    pub fn new(prediction: f64) -> Self {
        Self { prediction }
    }
}

impl ModelRuntime for FixedRuntime {
    type Model = FixedModel;

    fn load(&self, artifact: &Path, _options: &str) -> anyhow::Result<Self::Model> {
        if !artifact.exists() {
            anyhow::bail!("model artifact not found: {}", artifact.display());
        }
        Ok(FixedModel {
            prediction: self.prediction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fixed_runtime_loads_existing_artifact() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"weights").expect("write");

        let runtime = FixedRuntime::new(2.0);
        let model = runtime.load(file.path(), "--quiet").expect("load");
        assert_eq!(model.predict("| f1 f2").expect("predict"), 2.0);
    }

    #[test]
    fn test_fixed_runtime_rejects_missing_artifact() {
        let runtime = FixedRuntime::new(1.0);
        let result = runtime.load(Path::new("/nonexistent/model.bin"), "--quiet");
        assert!(result.is_err());
    }
}
