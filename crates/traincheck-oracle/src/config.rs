//! Expected-outcome configurations, one typed struct per oracle.
//!
//! Each check decodes from a flat JSON option bag via `from_params`:
//! unrecognized keys are ignored (forward-compatible), missing required
//! keys are a hard error at decode time, and optional keys carry the
//! documented defaults.

use serde::{Deserialize, Serialize};

use crate::compare::Tolerance;
use crate::parse::SignHandling;

fn default_atol() -> f64 {
    1e-8
}

fn default_rtol() -> f64 {
    1e-5
}

fn default_threshold() -> f64 {
    0.9
}

fn default_decimal() -> u32 {
    2
}

fn default_model_options() -> String {
    "--quiet".to_string()
}

/// A check configuration could not be decoded from its option bag.
#[derive(Debug, thiserror::Error)]
#[error("invalid check configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

/// Expected trained weights, compared strictly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightCheck {
    /// Expected weight sequence, in file order.
    pub expected_weights: Vec<f64>,

    /// Absolute tolerance.
    #[serde(default = "default_atol")]
    pub atol: f64,

    /// Relative tolerance.
    #[serde(default = "default_rtol")]
    pub rtol: f64,

    /// Keep leading minus signs when extracting numeric tokens (corrected
    /// variant of the legacy sign-dropping extraction).
    #[serde(default)]
    pub preserve_sign: bool,
}

impl WeightCheck {
    /// Create a check with default tolerances.
    pub fn new(expected_weights: Vec<f64>) -> Self {
        Self {
            expected_weights,
            atol: default_atol(),
            rtol: default_rtol(),
            preserve_sign: false,
        }
    }

    /// Decode from a flat option bag.
    pub fn from_params(params: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(params)?)
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.atol, self.rtol)
    }

    pub fn sign_handling(&self) -> SignHandling {
        if self.preserve_sign {
            SignHandling::Preserve
        } else {
            SignHandling::Discard
        }
    }
}

/// Expected prediction value, broadcast across all predictions and compared
/// under the majority policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionCheck {
    /// Value every prediction is expected to be close to.
    pub expected_value: f64,

    /// Absolute tolerance.
    #[serde(default = "default_atol")]
    pub atol: f64,

    /// Relative tolerance.
    #[serde(default = "default_rtol")]
    pub rtol: f64,

    /// Minimum fraction of elements that must be within tolerance.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Keep leading minus signs when extracting numeric tokens.
    #[serde(default)]
    pub preserve_sign: bool,
}

impl PredictionCheck {
    /// Create a check with default tolerances and threshold.
    pub fn new(expected_value: f64) -> Self {
        Self {
            expected_value,
            atol: default_atol(),
            rtol: default_rtol(),
            threshold: default_threshold(),
            preserve_sign: false,
        }
    }

    /// Decode from a flat option bag.
    pub fn from_params(params: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(params)?)
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.atol, self.rtol)
    }

    pub fn sign_handling(&self) -> SignHandling {
        if self.preserve_sign {
            SignHandling::Preserve
        } else {
            SignHandling::Discard
        }
    }
}

/// Expected loss, compared for equality at a rounding precision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LossCheck {
    /// Expected loss value.
    pub expected_loss: f64,

    /// Decimal places both sides are rounded to before comparing.
    #[serde(default = "default_decimal")]
    pub decimal: u32,
}

impl LossCheck {
    /// Create a check with the default precision.
    pub fn new(expected_loss: f64) -> Self {
        Self {
            expected_loss,
            decimal: default_decimal(),
        }
    }

    /// Decode from a flat option bag.
    pub fn from_params(params: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(params)?)
    }
}

/// Upper bound on the reported loss (boundary inclusive).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LossBoundCheck {
    /// Loss must not exceed this value.
    pub expected_loss: f64,
}

impl LossBoundCheck {
    pub fn new(expected_loss: f64) -> Self {
        Self { expected_loss }
    }

    /// Decode from a flat option bag.
    pub fn from_params(params: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(params)?)
    }
}

/// Reference to a registered expected-data generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataFuncRef {
    /// Generator name to resolve.
    pub name: String,

    /// Ordered positional parameters passed to the generator.
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
}

/// Accuracy check against freshly generated ground-truth data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDataCheck {
    /// Which generator regenerates the ground truth.
    pub data_func: DataFuncRef,

    /// Minimum accuracy (correct / total) required to pass.
    pub accuracy_threshold: f64,

    /// Options string handed to the model runtime at load time.
    #[serde(default = "default_model_options")]
    pub model_options: String,
}

impl GeneratedDataCheck {
    /// Create a check with default model options.
    pub fn new(data_func: DataFuncRef, accuracy_threshold: f64) -> Self {
        Self {
            data_func,
            accuracy_threshold,
            model_options: default_model_options(),
        }
    }

    /// Decode from a flat option bag.
    pub fn from_params(params: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(params)?)
    }
}
