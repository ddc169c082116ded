//! Stable edge ordering
//!
//! Edges are ordered by destination, then by source. The transposed CSR is
//! filled straight from this order, so every in-neighbour slice ends up
//! ascending; Jaccard relies on that.

use crate::common::Edge;
use crate::error::{try_filled, AlgoResult};

#[inline]
fn precedes(a: &Edge, b: &Edge) -> bool {
    a.target < b.target || (a.target == b.target && a.source <= b.source)
}

/// Sort edges by `(target, source)` with a stable merge sort.
///
/// O(M log M) time and one O(M) scratch buffer. Inputs of length 0 or 1 are
/// returned untouched.
pub fn sort_edges(mut edges: Vec<Edge>) -> AlgoResult<Vec<Edge>> {
    if edges.len() <= 1 {
        return Ok(edges);
    }
    let mut scratch = try_filled("merge sort scratch", edges.len(), Edge::new(0, 0))?;
    merge_sort(&mut edges, &mut scratch);
    Ok(edges)
}

fn merge_sort(edges: &mut [Edge], scratch: &mut [Edge]) {
    let len = edges.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    {
        let (left, right) = edges.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        merge_sort(left, left_scratch);
        merge_sort(right, right_scratch);
    }
    // Already in order: nothing to merge
    if precedes(&edges[mid - 1], &edges[mid]) {
        return;
    }
    scratch[..len].copy_from_slice(edges);
    merge(&scratch[..mid], &scratch[mid..len], edges);
}

fn merge(left: &[Edge], right: &[Edge], out: &mut [Edge]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        // Ties go to the left run, which keeps the sort stable
        let take_left = j >= right.len() || (i < left.len() && precedes(&left[i], &right[j]));
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}

/// `true` if the edges are in `(target, source)` order
pub fn is_sorted_by_target(edges: &[Edge]) -> bool {
    edges.windows(2).all(|w| precedes(&w[0], &w[1]))
}
