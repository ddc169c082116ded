//! Jaccard similarity between the in-neighbour sets of the top-K nodes

use crate::common::{CsrView, NodeId};
use crate::error::{AlgoError, AlgoResult};
use crate::topk::top_k;
use ndarray::Array2;
use std::io::{self, Write};
use tracing::debug;

/// Jaccard coefficient of two ascending id slices.
///
/// Walks both slices once: every step counts towards the union, equal ids
/// also count towards the intersection. Two empty slices give 0.0.
pub fn jaccard_coefficient(a: &[i32], b: &[i32]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut intersection = 0usize;
    let mut union = 0usize;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                intersection += 1;
                i += 1;
                j += 1;
            }
        }
        union += 1;
    }
    union += (a.len() - i) + (b.len() - j);

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Top-K nodes of a score vector and their pairwise Jaccard coefficients
#[derive(Debug, Clone)]
pub struct JaccardReport {
    /// Top-K node ids, best first
    pub nodes: Vec<NodeId>,
    /// Scores of `nodes`
    pub scores: Vec<f64>,
    /// In-degree of each of `nodes`
    pub degrees: Vec<usize>,
    /// Symmetric K x K matrix; the diagonal is not computed
    pub coefficients: Array2<f64>,
}

impl JaccardReport {
    pub fn k(&self) -> usize {
        self.nodes.len()
    }

    /// `(n1, n2, J(n1, n2))` for every pair with `i < j` in rank order
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        let k = self.k();
        (0..k).flat_map(move |i| {
            ((i + 1)..k).map(move |j| (self.nodes[i], self.nodes[j], self.coefficients[[i, j]]))
        })
    }

    /// Write the `n1,n2,jac` CSV table
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "n1,n2,jac")?;
        for (a, b, jac) in self.pairs() {
            writeln!(writer, "{},{},{:.3}", a, b, jac)?;
        }
        writer.flush()
    }
}

/// Select the top-K nodes by `scores` and compare their in-neighbour sets.
///
/// `transposed` must be destination-keyed with ascending rows, which is what
/// the cache builder produces from sorted edges.
pub fn top_k_jaccard(scores: &[f64], transposed: &CsrView<'_>, k: usize) -> AlgoResult<JaccardReport> {
    if scores.len() != transposed.node_count() {
        return Err(AlgoError::DimensionMismatch(format!(
            "{} scores for a matrix of {} nodes",
            scores.len(),
            transposed.node_count()
        )));
    }
    let nodes = top_k(scores, k)?;
    let degrees: Vec<usize> = nodes.iter().map(|&n| transposed.degree(n as usize)).collect();
    debug!("Top-{} nodes: {:?}", k, nodes);
    debug!("Degree distribution: {:?}", degrees);

    let mut coefficients = Array2::<f64>::zeros((k, k));
    for i in 0..k {
        let row_i = transposed.row(nodes[i] as usize);
        for j in (i + 1)..k {
            let row_j = transposed.row(nodes[j] as usize);
            let jac = jaccard_coefficient(row_i, row_j);
            coefficients[[i, j]] = jac;
            coefficients[[j, i]] = jac;
        }
    }

    Ok(JaccardReport {
        scores: nodes.iter().map(|&n| scores[n as usize]).collect(),
        nodes,
        degrees,
        coefficients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_edge_cases() {
        assert_eq!(jaccard_coefficient(&[1, 4, 7], &[1, 4, 7]), 1.0);
        assert_eq!(jaccard_coefficient(&[0, 2], &[1, 3]), 0.0);
        assert_eq!(jaccard_coefficient(&[], &[]), 0.0);
        assert_eq!(jaccard_coefficient(&[5], &[]), 0.0);
    }

    #[test]
    fn test_coefficient_partial_overlap() {
        // {1,2,3} vs {2,3,4,5}: 2 shared, 5 total
        let j = jaccard_coefficient(&[1, 2, 3], &[2, 3, 4, 5]);
        assert!((j - 0.4).abs() < 1e-12);
        assert_eq!(j, jaccard_coefficient(&[2, 3, 4, 5], &[1, 2, 3]));
    }

    #[test]
    fn test_top_k_jaccard_report() {
        // in-neighbours: 0 <- {}, 1 <- {0, 2}, 2 <- {0}, 3 <- {0, 2}
        let row_ptr = [0, 0, 2, 3, 5];
        let col_ind = [0, 2, 0, 0, 2];
        let view = CsrView::new(&row_ptr, &col_ind, None).unwrap();
        let scores = [0.1, 0.4, 0.2, 0.3];

        let report = top_k_jaccard(&scores, &view, 3).unwrap();
        assert_eq!(report.nodes, vec![1, 3, 2]);
        assert_eq!(report.degrees, vec![2, 2, 1]);
        assert_eq!(report.coefficients[[0, 1]], 1.0);
        assert_eq!(report.coefficients[[0, 2]], 0.5);
        assert_eq!(report.coefficients[[2, 0]], report.coefficients[[0, 2]]);

        let mut csv = Vec::new();
        report.write_csv(&mut csv).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "n1,n2,jac\n1,3,1.000\n1,2,0.500\n3,2,0.500\n"
        );
    }

    #[test]
    fn test_score_length_must_match_matrix() {
        // Two nodes in the matrix, three scores
        let row_ptr = [0, 0, 1];
        let col_ind = [0];
        let view = CsrView::new(&row_ptr, &col_ind, None).unwrap();

        assert!(matches!(
            top_k_jaccard(&[0.1, 0.2, 0.9], &view, 2),
            Err(AlgoError::DimensionMismatch(_))
        ));
        assert!(matches!(
            top_k_jaccard(&[0.5], &view, 1),
            Err(AlgoError::DimensionMismatch(_))
        ));
    }
}
