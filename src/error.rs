//! Error taxonomy for the ranking pipelines
//!
//! Every failure is terminal for the run. Each variant names the path or the
//! operation that failed so the CLI can print a useful diagnostic.

use crate::persistence::StorageError;
use linkrank_algorithms::AlgoError;
use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    /// Input edge list could not be parsed; no cache was created
    #[error("Malformed input {path:?} (line {line}): {reason}")]
    MalformedInput {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A large buffer could not be allocated
    #[error("Allocation of {what} ({len} elements) failed: {source}")]
    Allocation {
        what: &'static str,
        len: usize,
        #[source]
        source: TryReserveError,
    },

    /// Writing a cache artifact failed; the partial directory was deleted
    #[error("Cache artifact {path:?} could not be written: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    /// A cache artifact is missing files or truncated; it was deleted
    #[error("Cache artifact {path:?} is corrupted and was removed: {source}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    /// Writing a result file failed; partial result files were removed
    #[error("Result file {path:?} could not be written: {source}")]
    ResultWrite {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    /// Invalid run configuration or dataset identity
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the input or a cache file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(AlgoError),
}

impl From<AlgoError> for RankError {
    fn from(err: AlgoError) -> Self {
        match err {
            AlgoError::Allocation { what, len, source } => RankError::Allocation { what, len, source },
            other => RankError::Algorithm(other),
        }
    }
}

pub type RankResult<T> = Result<T, RankError>;

#[cfg(test)]
mod tests {
    use super::*;
    use linkrank_algorithms::try_filled;

    #[test]
    fn test_allocation_failure_keeps_its_class() {
        let err: RankError = try_filled("scores", usize::MAX, 0.0f64).unwrap_err().into();
        assert!(matches!(
            err,
            RankError::Allocation {
                what: "scores",
                len: usize::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_other_algorithm_errors_are_wrapped() {
        let err: RankError = AlgoError::TopKOutOfRange { k: 5, node_count: 2 }.into();
        assert!(matches!(
            err,
            RankError::Algorithm(AlgoError::TopKOutOfRange { k: 5, node_count: 2 })
        ));
    }
}
