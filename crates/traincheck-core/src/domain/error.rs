//! Domain-level error taxonomy for job-result access.

/// Errors produced when reading required fields out of a job result.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job produced no output under flag: {flag}")]
    MissingOutput { flag: String },

    #[error("run produced no artifact under flag: {flag}")]
    MissingArtifact { flag: String },

    #[error("job has no run sub-results")]
    NoRuns,

    #[error("run reported no loss")]
    MissingLoss,

    #[error("run loss is not a real number: {value}")]
    NonFiniteLoss { value: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for job-result access.
pub type Result<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_display() {
        let err = JobError::MissingOutput {
            flag: "-p".to_string(),
        };
        assert!(err.to_string().contains("-p"));

        let err = JobError::MissingArtifact {
            flag: "-f".to_string(),
        };
        assert!(err.to_string().contains("-f"));

        let err = JobError::NonFiniteLoss { value: f64::NAN };
        assert!(err.to_string().contains("not a real number"));
    }
}
