//! Traincheck Oracle - assertion oracles for training-harness jobs
//!
//! Decides whether an executed training/prediction job's numeric outcome
//! matches expectations:
//! - Parses trainer output files (weight dumps, prediction dumps) into
//!   numeric sequences
//! - Compares them under combined absolute/relative tolerance, strictly or
//!   by majority
//! - Regenerates ground-truth data through a generator registry for
//!   accuracy checks against a freshly trained model

pub mod compare;
pub mod config;
pub mod oracle;
pub mod parse;
pub mod registry;

// Re-export key types
pub use compare::{broadcast, compare_close, CloseVerdict, LengthMismatch, Tolerance};
pub use config::{
    ConfigError, DataFuncRef, GeneratedDataCheck, LossBoundCheck, LossCheck, PredictionCheck,
    WeightCheck,
};
pub use oracle::{
    evaluate_check, evaluate_generated_accuracy, evaluate_loss, evaluate_loss_bound,
    evaluate_prediction, evaluate_weights, CheckSpec, OracleContext, OracleError, OracleResult,
    MODEL_FLAG, PREDICTIONS_FLAG, READABLE_MODEL_FLAG,
};
pub use parse::{
    numeric_token, parse_prediction_lines, parse_predictions_file, parse_weight_lines,
    parse_weights_file, ParseError, ParsedSequence, SignHandling,
};
pub use registry::{GeneratorFn, GeneratorRegistry, ResolveError};
