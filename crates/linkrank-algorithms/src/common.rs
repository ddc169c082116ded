//! Shared types for link-analysis algorithms
//!
//! Provides read-only, borrowed views of a graph in Compressed Sparse Row (CSR)
//! format. The views never own their arrays: they can sit on top of heap
//! buffers produced by a builder or on top of memory-mapped cache files.

use crate::error::{AlgoError, AlgoResult};

/// Node identifier (dense index in [0, N), stored as a 32-bit integer on disk)
pub type NodeId = i32;

/// A directed edge `source -> target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

/// A borrowed CSR matrix.
///
/// Row `r` owns the column indices `col_ind[row_ptr[r]..row_ptr[r + 1]]`
/// and, when present, the values at the same positions of `val`.
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a> {
    row_ptr: &'a [i32],
    col_ind: &'a [i32],
    val: Option<&'a [f64]>,
}

impl<'a> CsrView<'a> {
    /// Validate and wrap the three CSR arrays.
    ///
    /// Checks `row_ptr[0] == 0`, monotonic offsets, `row_ptr[N] == M`,
    /// every column index in [0, N) and `val.len() == M`.
    pub fn new(
        row_ptr: &'a [i32],
        col_ind: &'a [i32],
        val: Option<&'a [f64]>,
    ) -> AlgoResult<Self> {
        let (&first, rest) = row_ptr
            .split_first()
            .ok_or_else(|| AlgoError::InvalidRowPointers("row_ptr is empty".to_string()))?;
        if first != 0 {
            return Err(AlgoError::InvalidRowPointers(format!(
                "row_ptr[0] is {first}, expected 0"
            )));
        }

        let mut prev = first;
        for (i, &offset) in rest.iter().enumerate() {
            if offset < prev {
                return Err(AlgoError::InvalidRowPointers(format!(
                    "row_ptr[{}] = {offset} is smaller than row_ptr[{i}] = {prev}",
                    i + 1
                )));
            }
            prev = offset;
        }
        if prev as usize != col_ind.len() {
            return Err(AlgoError::InvalidRowPointers(format!(
                "row_ptr ends at {prev} but there are {} column indices",
                col_ind.len()
            )));
        }

        let node_count = row_ptr.len() - 1;
        for (position, &value) in col_ind.iter().enumerate() {
            if value < 0 || value as usize >= node_count {
                return Err(AlgoError::ColumnOutOfRange {
                    position,
                    value,
                    node_count,
                });
            }
        }

        if let Some(values) = val {
            if values.len() != col_ind.len() {
                return Err(AlgoError::ValueLengthMismatch {
                    values: values.len(),
                    edges: col_ind.len(),
                });
            }
        }

        Ok(Self {
            row_ptr,
            col_ind,
            val,
        })
    }

    /// Number of rows (N)
    pub fn node_count(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of stored non-zeros (M)
    pub fn edge_count(&self) -> usize {
        self.col_ind.len()
    }

    fn bounds(&self, row: usize) -> (usize, usize) {
        (self.row_ptr[row] as usize, self.row_ptr[row + 1] as usize)
    }

    /// Column indices of a row
    pub fn row(&self, row: usize) -> &'a [i32] {
        let (start, end) = self.bounds(row);
        &self.col_ind[start..end]
    }

    /// Values of a row, if the matrix is weighted
    pub fn row_values(&self, row: usize) -> Option<&'a [f64]> {
        let (start, end) = self.bounds(row);
        self.val.map(|v| &v[start..end])
    }

    /// Number of entries in a row
    pub fn degree(&self, row: usize) -> usize {
        let (start, end) = self.bounds(row);
        end - start
    }

    pub fn row_ptr(&self) -> &'a [i32] {
        self.row_ptr
    }

    pub fn col_ind(&self) -> &'a [i32] {
        self.col_ind
    }

    pub fn values(&self) -> Option<&'a [f64]> {
        self.val
    }

    pub fn is_weighted(&self) -> bool {
        self.val.is_some()
    }
}

/// Input of the PageRank solver: the weighted destination-keyed CSR
/// (row `r` lists the in-neighbours of `r` with weight `1/outdeg`) and the
/// ascending list of dangling nodes.
#[derive(Debug, Clone, Copy)]
pub struct PageRankGraph<'a> {
    transposed: CsrView<'a>,
    danglings: &'a [i32],
}

impl<'a> PageRankGraph<'a> {
    pub fn new(transposed: CsrView<'a>, danglings: &'a [i32]) -> AlgoResult<Self> {
        if !transposed.is_weighted() {
            return Err(AlgoError::MissingWeights);
        }
        let n = transposed.node_count();
        let mut prev: Option<i32> = None;
        for &d in danglings {
            if d < 0 || d as usize >= n {
                return Err(AlgoError::DimensionMismatch(format!(
                    "dangling node {d} outside of [0, {n})"
                )));
            }
            if prev.is_some_and(|p| p >= d) {
                return Err(AlgoError::DimensionMismatch(
                    "dangling set is not strictly ascending".to_string(),
                ));
            }
            prev = Some(d);
        }
        Ok(Self {
            transposed,
            danglings,
        })
    }

    pub fn node_count(&self) -> usize {
        self.transposed.node_count()
    }

    pub fn transposed(&self) -> &CsrView<'a> {
        &self.transposed
    }

    pub fn danglings(&self) -> &'a [i32] {
        self.danglings
    }
}

/// Input of the HITS solver: the same unweighted edge set keyed by source
/// (`forward`, out-neighbours) and by destination (`transposed`, in-neighbours).
#[derive(Debug, Clone, Copy)]
pub struct HitsGraph<'a> {
    forward: CsrView<'a>,
    transposed: CsrView<'a>,
}

impl<'a> HitsGraph<'a> {
    pub fn new(forward: CsrView<'a>, transposed: CsrView<'a>) -> AlgoResult<Self> {
        if forward.node_count() != transposed.node_count() {
            return Err(AlgoError::DimensionMismatch(format!(
                "forward matrix has {} rows, transposed has {}",
                forward.node_count(),
                transposed.node_count()
            )));
        }
        if forward.edge_count() != transposed.edge_count() {
            return Err(AlgoError::DimensionMismatch(format!(
                "forward matrix has {} edges, transposed has {}",
                forward.edge_count(),
                transposed.edge_count()
            )));
        }
        Ok(Self {
            forward,
            transposed,
        })
    }

    pub fn node_count(&self) -> usize {
        self.forward.node_count()
    }

    /// Out-neighbours of a node
    pub fn successors(&self, idx: usize) -> &'a [i32] {
        self.forward.row(idx)
    }

    /// In-neighbours of a node
    pub fn predecessors(&self, idx: usize) -> &'a [i32] {
        self.transposed.row(idx)
    }

    pub fn forward(&self) -> &CsrView<'a> {
        &self.forward
    }

    pub fn transposed(&self) -> &CsrView<'a> {
        &self.transposed
    }
}

/// Euclidean (L2) distance between two vectors of equal length
pub(crate) fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
