use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tempora workspace.
///
/// This wraps argument validation errors, variant mismatches, frequency
/// inference failures, codec parse failures, and I/O-layer errors.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemporaError {
    /// Invalid input argument (unsupported method, format, or extension).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An operation received a value of the wrong series variant.
    #[error("expected {expected}, got {got}")]
    TypeMismatch {
        /// The variant the operation required.
        expected: String,
        /// The concrete variant it received.
        got: String,
    },

    /// The frequency of a series could not be determined.
    #[error("frequency inference failed: {0}")]
    Inference(String),

    /// A textual representation could not be decoded back into a series.
    #[error("parse error: {0}")]
    Parse(String),

    /// Issues with the underlying data (empty series, ragged columns, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// A failure in the tabular file layer (reader/writer).
    #[error("file layer: {0}")]
    File(String),
}

impl TemporaError {
    /// Helper: build an `InvalidArg` error naming the offending value and the
    /// supported set.
    pub fn invalid_arg(value: impl Into<String>, supported: &str) -> Self {
        Self::InvalidArg(format!("{}. Supported: {supported}.", value.into()))
    }

    /// Helper: build a `TypeMismatch` error naming both variants.
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Helper: build a `Parse` error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arg_names_value_and_supported_set() {
        let err = TemporaError::invalid_arg("Invalid method: splice", "first, last, sum");
        assert_eq!(
            err.to_string(),
            "invalid argument: Invalid method: splice. Supported: first, last, sum."
        );
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = TemporaError::type_mismatch("UniSeries", "MultiSeries");
        assert_eq!(err.to_string(), "expected UniSeries, got MultiSeries");
    }

    #[test]
    fn errors_round_trip_through_serde() {
        let err = TemporaError::Parse("bad row".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(serde_json::from_str::<TemporaError>(&json).unwrap(), err);
    }
}
