//! Linkrank
//!
//! Link analysis over large directed graphs stored as text edge lists.
//! PageRank and HITS run over compressed sparse row (CSR) matrices that are
//! built once per dataset, cached on disk as flat binary arrays and
//! memory-mapped on every later run.
//!
//! # Layout
//!
//! - `graph`: edge-list parsing and CSR compression
//! - `persistence`: cache directories, mapped arrays, result files
//! - `algo`: adapter over the `linkrank-algorithms` solvers
//! - `config`: per-run configuration and derived paths
//! - `pipeline`: end-to-end runs
//!
//! ## Example Usage
//!
//! ```no_run
//! use linkrank::{run_pagerank, RunConfig};
//!
//! let config = RunConfig::new("data/web-Google.txt")?
//!     .with_cache_root("cache")
//!     .with_top_k(Some(10));
//! let report = run_pagerank(&config)?;
//! println!("{} iterations, sum = {}", report.iterations, report.score_sum);
//! # Ok::<(), linkrank::RankError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod pipeline;

pub use config::{Algorithm, DatasetId, RunConfig, SolverSettings};
pub use error::{RankError, RankResult};
pub use graph::{GraphMetadata, HitsCsr, PageRankCsr};
pub use persistence::{cache_exists, read_scores, StorageError, StorageResult};
pub use pipeline::{
    compress_hits, compress_pagerank, inspect_cache, run_hits, run_pagerank, CacheReport,
    HitsReport, PageRankReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
