//! HITS (hubs and authorities)
//!
//! Authority of a node is the sum of hub scores of its in-neighbours, hub
//! score is the sum of authority scores of its out-neighbours. Both vectors
//! are L1-normalized independently after every step; convergence is judged
//! on the L2 distance of each vector.

use super::common::{euclidean_distance, HitsGraph};
use crate::error::{try_filled, AlgoResult};
use std::time::Instant;
use tracing::{debug, info, warn};

/// HITS configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitsConfig {
    /// Both vectors must move less than this (L2) between iterations
    pub tolerance: f64,
    /// Hard cap on the number of iterations
    pub max_iterations: usize,
    /// Log progress every this many iterations (0 disables)
    pub progress_interval: usize,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            progress_interval: 10,
        }
    }
}

/// Outcome of a HITS run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HitsResult {
    pub authorities: Vec<f64>,
    pub hubs: Vec<f64>,
    pub iterations: usize,
    pub authority_residual: f64,
    pub hub_residual: f64,
}

impl HitsResult {
    pub fn authority_sum(&self) -> f64 {
        self.authorities.iter().sum()
    }

    pub fn hub_sum(&self) -> f64 {
        self.hubs.iter().sum()
    }

    pub fn converged(&self, tolerance: f64) -> bool {
        self.authority_residual <= tolerance && self.hub_residual <= tolerance
    }
}

/// Divide every entry by the vector's sum. A zero sum leaves the vector as is.
fn normalize_l1(v: &mut [f64], name: &str) {
    let sum: f64 = v.iter().sum();
    if sum == 0.0 {
        warn!("{} vector sums to zero, skipping normalization", name);
        return;
    }
    for x in v.iter_mut() {
        *x /= sum;
    }
}

/// Run HITS on the graph
pub fn hits(graph: &HitsGraph<'_>, config: &HitsConfig) -> AlgoResult<HitsResult> {
    let n = graph.node_count();

    if n == 0 {
        return Ok(HitsResult {
            authorities: Vec::new(),
            hubs: Vec::new(),
            iterations: 0,
            authority_residual: 0.0,
            hub_residual: 0.0,
        });
    }

    let mut authorities = try_filled("authority scores", n, 1.0)?;
    let mut hubs = try_filled("hub scores", n, 1.0)?;
    let mut next_authorities = try_filled("authority scratch", n, 0.0)?;
    let mut next_hubs = try_filled("hub scratch", n, 0.0)?;

    info!(
        "Computing HITS over {} nodes, {} edges",
        n,
        graph.forward().edge_count()
    );
    let started = Instant::now();

    let mut authority_residual = f64::MAX;
    let mut hub_residual = f64::MAX;
    let mut iterations = 0;

    while (authority_residual > config.tolerance || hub_residual > config.tolerance)
        && iterations < config.max_iterations
    {
        if config.progress_interval > 0 && iterations % config.progress_interval == 0 {
            debug!("HITS iteration {}", iterations);
        }

        for row in 0..n {
            next_authorities[row] = graph
                .predecessors(row)
                .iter()
                .map(|&c| hubs[c as usize])
                .sum();
            next_hubs[row] = graph
                .successors(row)
                .iter()
                .map(|&c| authorities[c as usize])
                .sum();
        }

        normalize_l1(&mut next_authorities, "authority");
        normalize_l1(&mut next_hubs, "hub");

        authority_residual = euclidean_distance(&authorities, &next_authorities);
        hub_residual = euclidean_distance(&hubs, &next_hubs);

        std::mem::swap(&mut authorities, &mut next_authorities);
        std::mem::swap(&mut hubs, &mut next_hubs);
        iterations += 1;
    }

    let result = HitsResult {
        authorities,
        hubs,
        iterations,
        authority_residual,
        hub_residual,
    };
    info!(
        "HITS finished after {} iterations in {:.3}s (sum(a) = {:.6}, sum(h) = {:.6})",
        iterations,
        started.elapsed().as_secs_f64(),
        result.authority_sum(),
        result.hub_sum()
    );

    Ok(result)
}
