//! Error types for the algorithms crate

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while validating inputs or running an algorithm
#[derive(Error, Debug)]
pub enum AlgoError {
    /// The row pointer array does not describe a valid CSR layout
    #[error("Invalid CSR row pointers: {0}")]
    InvalidRowPointers(String),

    /// A column index points outside of [0, N)
    #[error("Column index {value} at position {position} is out of range for {node_count} nodes")]
    ColumnOutOfRange {
        position: usize,
        value: i32,
        node_count: usize,
    },

    /// The value array is not aligned with the column index array
    #[error("Value array has {values} entries but the matrix has {edges} non-zeros")]
    ValueLengthMismatch { values: usize, edges: usize },

    /// Two structures that must describe the same graph disagree
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Weighted matrix expected but no values present
    #[error("Matrix has no edge weights")]
    MissingWeights,

    /// K larger than the number of scored nodes
    #[error("Top-K of {k} requested but only {node_count} nodes are scored")]
    TopKOutOfRange { k: usize, node_count: usize },

    /// A working buffer could not be allocated
    #[error("Allocation of {what} ({len} elements) failed: {source}")]
    Allocation {
        what: &'static str,
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type AlgoResult<T> = Result<T, AlgoError>;

/// Allocate a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> AlgoResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| AlgoError::Allocation { what, len, source })?;
    buf.resize(len, value);
    Ok(buf)
}

/// Allocate an empty vector able to hold `len` elements without reallocating.
pub fn try_with_capacity<T>(what: &'static str, len: usize) -> AlgoResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| AlgoError::Allocation { what, len, source })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impossible_allocation_is_reported() {
        let err = try_filled("scores", usize::MAX, 0u8).unwrap_err();
        assert!(matches!(
            err,
            AlgoError::Allocation {
                what: "scores",
                len: usize::MAX,
                ..
            }
        ));
        assert!(matches!(
            try_with_capacity::<f64>("edges", usize::MAX),
            Err(AlgoError::Allocation { what: "edges", .. })
        ));
    }

    #[test]
    fn test_small_buffers() {
        assert_eq!(try_filled("ids", 3, 7i32).unwrap(), vec![7, 7, 7]);
        let buf = try_with_capacity::<i32>("ids", 4).unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 4);
    }
}
