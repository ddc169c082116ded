//! Bounded selection of the highest-scoring nodes

use crate::common::NodeId;
use crate::error::{try_with_capacity, AlgoError, AlgoResult};

/// `a` outranks `b`: higher score, or equal score and smaller index
#[inline]
fn outranks(scores: &[f64], a: usize, b: usize) -> bool {
    scores[a] > scores[b] || (scores[a] == scores[b] && a < b)
}

/// Return the `k` node ids with the highest scores, best first.
///
/// Ties are broken by ascending node id. The candidates are kept in a small
/// array ordered worst-to-best; a later node only evicts the current worst
/// on a strictly greater score. O(N·K) time, O(K) space.
pub fn top_k(scores: &[f64], k: usize) -> AlgoResult<Vec<NodeId>> {
    let n = scores.len();
    if k > n {
        return Err(AlgoError::TopKOutOfRange { k, node_count: n });
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    // best[0] is the weakest candidate, best[k - 1] the strongest
    let mut best: Vec<usize> = try_with_capacity("top-k buffer", k)?;

    for idx in 0..k {
        best.push(idx);
        let mut pos = best.len() - 1;
        while pos > 0 && outranks(scores, best[pos - 1], idx) {
            best[pos] = best[pos - 1];
            pos -= 1;
        }
        best[pos] = idx;
    }

    for idx in k..n {
        if scores[idx] > scores[best[0]] {
            let mut pos = 0;
            while pos + 1 < k && outranks(scores, idx, best[pos + 1]) {
                best[pos] = best[pos + 1];
                pos += 1;
            }
            best[pos] = idx;
        }
    }

    Ok(best.into_iter().rev().map(|idx| idx as NodeId).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn reference(scores: &[f64], k: usize) -> Vec<NodeId> {
        let mut idx: Vec<usize> = (0..scores.len()).collect();
        idx.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        idx.into_iter().take(k).map(|i| i as NodeId).collect()
    }

    #[test]
    fn test_basic_selection() {
        let scores = [0.1, 0.5, 0.2, 0.9, 0.3];
        assert_eq!(top_k(&scores, 3).unwrap(), vec![3, 1, 4]);
        assert_eq!(top_k(&scores, 5).unwrap(), vec![3, 1, 4, 2, 0]);
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let scores = [0.5, 0.7, 0.5, 0.7, 0.5];
        assert_eq!(top_k(&scores, 3).unwrap(), vec![1, 3, 0]);
        assert_eq!(top_k(&[1.0; 6], 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_bounds() {
        assert!(top_k(&[1.0, 2.0], 0).unwrap().is_empty());
        assert!(matches!(
            top_k(&[1.0, 2.0], 3),
            Err(AlgoError::TopKOutOfRange { k: 3, node_count: 2 })
        ));
    }

    #[test]
    fn test_matches_full_sort() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in [1usize, 2, 10, 100, 500] {
            // Coarse values so ties are common
            let scores: Vec<f64> = (0..n).map(|_| rng.gen_range(0..20) as f64 / 20.0).collect();
            for k in [1usize, 2, 5, 10, 50] {
                if k > n {
                    continue;
                }
                assert_eq!(top_k(&scores, k).unwrap(), reference(&scores, k), "n={n} k={k}");
            }
        }
    }
}
