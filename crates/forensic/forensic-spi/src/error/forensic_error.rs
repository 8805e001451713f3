//! Forensic scoring error types.

use std::io;

use thiserror::Error;

/// Forensic scoring errors.
#[derive(Debug, Error)]
pub enum ForensicError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Detector not fitted: call fit() before detect()")]
    NotFitted,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Detection error: {0}")]
    DetectionError(String),

    #[error("Tick regression: last tick {last}, got {got}")]
    TickRegression { last: u64, got: u64 },

    #[error("Data source '{source_name}' failed: {reason}")]
    Source { source_name: String, reason: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ForensicError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for forensic scoring operations.
pub type Result<T> = std::result::Result<T, ForensicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let error = ForensicError::InsufficientData {
            required: 2,
            got: 1,
        };
        assert_eq!(error.to_string(), "Insufficient data: required 2, got 1");
    }

    #[test]
    fn test_not_fitted_display() {
        let error = ForensicError::NotFitted;
        assert_eq!(
            error.to_string(),
            "Detector not fitted: call fit() before detect()"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = ForensicError::invalid_parameter("contamination_rate", "must be in (0, 0.5]");
        assert_eq!(
            error.to_string(),
            "Invalid parameter: contamination_rate - must be in (0, 0.5]"
        );
    }

    #[test]
    fn test_tick_regression_display() {
        let error = ForensicError::TickRegression { last: 12, got: 3 };
        assert_eq!(error.to_string(), "Tick regression: last tick 12, got 3");
    }

    #[test]
    fn test_source_display() {
        let error = ForensicError::source("awards.json", "file not found");
        assert_eq!(
            error.to_string(),
            "Data source 'awards.json' failed: file not found"
        );
    }

    #[test]
    fn test_io_error_is_transparent() {
        let error: ForensicError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(error.to_string(), "missing");
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(ForensicError::NotFitted);
        assert!(matches!(result.unwrap_err(), ForensicError::NotFitted));
    }

    #[test]
    fn test_all_error_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForensicError>();
    }
}
