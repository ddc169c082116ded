//! PageRank algorithm implementation
//!
//! Damped power iteration over the transposed, weighted adjacency matrix.
//! Mass held by dangling nodes is spread uniformly over all nodes so the
//! score vector stays a probability distribution.

use super::common::{euclidean_distance, PageRankGraph};
use crate::error::{try_filled, AlgoResult};
use std::time::Instant;
use tracing::{debug, info};

/// PageRank configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Stop once the L2 distance between two iterates drops to this value
    pub tolerance: f64,
    /// Hard cap on the number of iterations
    pub max_iterations: usize,
    /// Log progress every this many iterations (0 disables)
    pub progress_interval: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            tolerance: 1e-10,
            max_iterations: 200,
            progress_interval: 10,
        }
    }
}

/// Outcome of a PageRank run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageRankResult {
    /// One probability per node
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// L2 distance between the last two iterates
    pub residual: f64,
}

impl PageRankResult {
    /// Total mass, ~1.0 after convergence
    pub fn sum(&self) -> f64 {
        self.scores.iter().sum()
    }

    pub fn converged(&self, tolerance: f64) -> bool {
        self.residual <= tolerance
    }
}

/// Calculate PageRank for the graph
pub fn page_rank(graph: &PageRankGraph<'_>, config: &PageRankConfig) -> AlgoResult<PageRankResult> {
    let n = graph.node_count();

    if n == 0 {
        return Ok(PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            residual: 0.0,
        });
    }

    let inv_n = 1.0 / n as f64;
    let mut scores = try_filled("pagerank scores", n, inv_n)?;
    let mut next_scores = try_filled("pagerank scratch", n, 0.0)?;

    let d = config.damping_factor;
    let teleport = (1.0 - d) * inv_n;
    let transposed = graph.transposed();
    let danglings = graph.danglings();

    info!(
        "Computing PageRank over {} nodes, {} edges ({} dangling)",
        n,
        transposed.edge_count(),
        danglings.len()
    );
    let started = Instant::now();

    let mut residual = f64::MAX;
    let mut iterations = 0;

    while residual > config.tolerance && iterations < config.max_iterations {
        if config.progress_interval > 0 && iterations % config.progress_interval == 0 {
            debug!("PageRank iteration {}", iterations);
        }

        let dangling_mass: f64 =
            danglings.iter().map(|&j| scores[j as usize]).sum::<f64>() * inv_n;

        for (row, next) in next_scores.iter_mut().enumerate() {
            let sources = transposed.row(row);
            let weights = transposed.row_values(row).unwrap_or_default();
            let incoming: f64 = sources
                .iter()
                .zip(weights)
                .map(|(&c, &w)| scores[c as usize] * w)
                .sum();
            *next = d * (dangling_mass + incoming) + teleport;
        }

        residual = euclidean_distance(&scores, &next_scores);
        std::mem::swap(&mut scores, &mut next_scores);
        iterations += 1;
    }

    let result = PageRankResult {
        scores,
        iterations,
        residual,
    };
    info!(
        "PageRank finished after {} iterations in {:.3}s (residual {:e}, sum(p) = {:.6})",
        iterations,
        started.elapsed().as_secs_f64(),
        residual,
        result.sum()
    );

    Ok(result)
}
