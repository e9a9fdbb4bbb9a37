//! Tolerance-based numeric comparison.
//!
//! Two verdict modes over the same elementwise closeness predicate:
//! - strict: every element must be close (weight checks)
//! - majority: at least `threshold × total` elements must be close
//!   (prediction checks, which tolerate noisy individual examples while
//!   requiring overall directional correctness)

use serde::{Deserialize, Serialize};

/// Combined absolute/relative tolerance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tolerance {
    /// Absolute tolerance.
    pub atol: f64,

    /// Relative tolerance, scaled by the expected value's magnitude.
    pub rtol: f64,
}

impl Tolerance {
    /// Create a tolerance.
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }

    /// Elementwise closeness: `|observed - expected| <= atol + rtol * |expected|`.
    pub fn is_close(&self, observed: f64, expected: f64) -> bool {
        (observed - expected).abs() <= self.atol + self.rtol * expected.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: 1e-8,
            rtol: 1e-5,
        }
    }
}

/// Observed and expected sequences have different lengths.
#[derive(Debug, thiserror::Error)]
#[error("sequence length mismatch: observed {observed} elements, expected {expected}")]
pub struct LengthMismatch {
    pub observed: usize,
    pub expected: usize,
}

/// Outcome of an elementwise comparison, with enough context to build a
/// diagnostic message on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloseVerdict {
    /// Elements compared.
    pub total: usize,

    /// Elements within tolerance.
    pub passing: usize,

    /// Indices of elements outside tolerance.
    pub mismatches: Vec<usize>,
}

impl CloseVerdict {
    /// Strict mode: every element within tolerance.
    pub fn all_close(&self) -> bool {
        self.passing == self.total
    }

    /// Majority mode: `passing >= threshold * total`, boundary inclusive.
    pub fn majority_close(&self, threshold: f64) -> bool {
        self.passing as f64 >= threshold * self.total as f64
    }

    /// Fraction of elements within tolerance.
    pub fn pass_fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.passing as f64 / self.total as f64
        }
    }
}

/// Compare two equal-length sequences elementwise under `tol`.
pub fn compare_close(
    observed: &[f64],
    expected: &[f64],
    tol: Tolerance,
) -> Result<CloseVerdict, LengthMismatch> {
    if observed.len() != expected.len() {
        return Err(LengthMismatch {
            observed: observed.len(),
            expected: expected.len(),
        });
    }

    let mismatches: Vec<usize> = observed
        .iter()
        .zip(expected.iter())
        .enumerate()
        .filter(|(_, (o, e))| !tol.is_close(**o, **e))
        .map(|(i, _)| i)
        .collect();

    Ok(CloseVerdict {
        total: observed.len(),
        passing: observed.len() - mismatches.len(),
        mismatches,
    })
}

/// Broadcast a single expected value to a sequence of `len` copies.
pub fn broadcast(value: f64, len: usize) -> Vec<f64> {
    vec![value; len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_comparison_always_passes_strict() {
        let values = vec![0.0, -1.5, 42.0, 1e-12, 1e12];
        for atol in [0.0, 1e-8, 1.0] {
            let tol = Tolerance::new(atol, 0.0);
            let verdict = compare_close(&values, &values, tol).expect("compare");
            assert!(verdict.all_close(), "atol {atol} should pass");
            assert!(verdict.mismatches.is_empty());
        }
    }

    #[test]
    fn test_is_close_combined_tolerance() {
        let tol = Tolerance::new(0.1, 0.0);
        assert!(tol.is_close(1.05, 1.0));
        assert!(!tol.is_close(1.2, 1.0));

        // rtol scales with the expected magnitude
        let tol = Tolerance::new(0.0, 0.01);
        assert!(tol.is_close(101.0, 100.0));
        assert!(!tol.is_close(1.01 + 1e-6, 1.0));
    }

    #[test]
    fn test_majority_boundary_inclusive() {
        // 9 of 10 close, threshold 0.9: boundary must pass.
        let verdict = CloseVerdict {
            total: 10,
            passing: 9,
            mismatches: vec![3],
        };
        assert!(verdict.majority_close(0.9));
    }

    #[test]
    fn test_majority_below_threshold_fails() {
        let verdict = CloseVerdict {
            total: 10,
            passing: 8,
            mismatches: vec![1, 4],
        };
        assert!(!verdict.majority_close(0.9));
        assert!(verdict.majority_close(0.8));
    }

    #[test]
    fn test_compare_close_counts_and_indices() {
        let observed = vec![1.0, 2.0, 10.0, 4.0];
        let expected = vec![1.0, 2.5, 10.0, 8.0];
        let verdict = compare_close(&observed, &expected, Tolerance::default()).expect("compare");

        assert_eq!(verdict.total, 4);
        assert_eq!(verdict.passing, 2);
        assert_eq!(verdict.mismatches, vec![1, 3]);
        assert!((verdict.pass_fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compare_close_length_mismatch() {
        let err = compare_close(&[1.0, 2.0], &[1.0], Tolerance::default()).expect_err("mismatch");
        assert_eq!(err.observed, 2);
        assert_eq!(err.expected, 1);
    }

    #[test]
    fn test_nan_is_never_close() {
        let tol = Tolerance::new(1.0, 1.0);
        assert!(!tol.is_close(f64::NAN, 0.0));
    }

    #[test]
    fn test_broadcast() {
        assert_eq!(broadcast(0.5, 3), vec![0.5, 0.5, 0.5]);
        assert!(broadcast(0.5, 0).is_empty());
    }
}
