//! End-to-end runs
//!
//! Each run follows the same sequence: check the cache directory, compress
//! the edge list on a miss, map the cache, solve, write the score files and
//! optionally the Top-K Jaccard tables.

use crate::algo::{hits, page_rank, top_k_jaccard, ScoreKind, TopKSummary};
use crate::config::{Algorithm, DatasetId, RunConfig};
use crate::error::{RankError, RankResult};
use crate::graph::{build_hits, build_pagerank, read_edge_list, GraphMetadata};
use crate::persistence::{
    cache_exists, write_hits_cache, write_jaccard_csv, write_pagerank_cache, write_score_files,
    HitsCache, PageRankCache, StorageError,
};
use linkrank_algorithms::{AlgoError, CsrView};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Outcome of a PageRank run
#[derive(Debug, Clone, Serialize)]
pub struct PageRankReport {
    pub dataset: DatasetId,
    pub cache_dir: PathBuf,
    /// `false` when the edge list had to be compressed first
    pub cache_hit: bool,
    pub graph: GraphMetadata,
    pub iterations: usize,
    pub residual: f64,
    pub converged: bool,
    /// Should be ~1.0
    pub score_sum: f64,
    pub load_secs: f64,
    pub solve_secs: f64,
    pub result_path: PathBuf,
    pub top_k: Option<TopKSummary>,
}

/// Outcome of a HITS run
#[derive(Debug, Clone, Serialize)]
pub struct HitsReport {
    pub dataset: DatasetId,
    pub cache_dir: PathBuf,
    pub cache_hit: bool,
    pub graph: GraphMetadata,
    pub iterations: usize,
    pub authority_residual: f64,
    pub hub_residual: f64,
    pub converged: bool,
    pub authority_sum: f64,
    pub hub_sum: f64,
    pub load_secs: f64,
    pub solve_secs: f64,
    pub authority_path: PathBuf,
    pub hub_path: PathBuf,
    pub top_authorities: Option<TopKSummary>,
    pub top_hubs: Option<TopKSummary>,
}

/// Metadata of an existing cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub algorithm: Algorithm,
    pub dataset: DatasetId,
    pub cache_dir: PathBuf,
    pub graph: GraphMetadata,
}

/// Parse the input and write the PageRank cache, without solving
pub fn compress_pagerank(config: &RunConfig) -> RankResult<GraphMetadata> {
    let dir = config.cache_dir(Algorithm::PageRank);
    info!("Compressing {:?} into {:?}", config.input(), dir);

    let csr = build_pagerank(read_edge_list(config.input())?)?;
    write_pagerank_cache(&dir, &csr)?;
    Ok(csr.metadata())
}

/// Parse the input and write the HITS cache, without solving
pub fn compress_hits(config: &RunConfig) -> RankResult<GraphMetadata> {
    let dir = config.cache_dir(Algorithm::Hits);
    info!("Compressing {:?} into {:?}", config.input(), dir);

    let csr = build_hits(read_edge_list(config.input())?)?;
    write_hits_cache(&dir, &csr)?;
    Ok(csr.metadata())
}

/// Compress on a miss; returns whether the cache was already there
fn ensure_cache(
    config: &RunConfig,
    algorithm: Algorithm,
    compress: fn(&RunConfig) -> RankResult<GraphMetadata>,
) -> RankResult<bool> {
    let dir = config.cache_dir(algorithm);
    if cache_exists(&dir) {
        info!("Cache hit: {:?}", dir);
        return Ok(true);
    }
    info!("Cache miss: {:?}", dir);
    compress(config)?;
    Ok(false)
}

fn check_top_k(config: &RunConfig, node_count: usize) -> RankResult<()> {
    match config.top_k() {
        Some(k) if k > node_count => Err(AlgoError::TopKOutOfRange { k, node_count }.into()),
        _ => Ok(()),
    }
}

fn ensure_output_dir(config: &RunConfig) -> RankResult<()> {
    let dir = config.output_dir();
    fs::create_dir_all(dir).map_err(|source| RankError::ResultWrite {
        path: dir.to_path_buf(),
        source: StorageError::Io {
            path: dir.to_path_buf(),
            source,
        },
    })
}

fn jaccard_summary(
    config: &RunConfig,
    kind: ScoreKind,
    scores: &[f64],
    transposed: &CsrView<'_>,
    k: usize,
) -> RankResult<TopKSummary> {
    info!("Top-{} {} nodes and their Jaccard coefficients", k, kind);
    let report = top_k_jaccard(scores, transposed, k)?;
    let path = config.jaccard_report_path(kind.tag(), k);
    write_jaccard_csv(&path, &report)?;
    Ok(TopKSummary::from_report(kind, &report, path))
}

/// Rank the dataset with PageRank
pub fn run_pagerank(config: &RunConfig) -> RankResult<PageRankReport> {
    let started = Instant::now();
    let cache_dir = config.cache_dir(Algorithm::PageRank);
    let cache_hit = ensure_cache(config, Algorithm::PageRank, compress_pagerank)?;

    let cache = PageRankCache::open(&cache_dir)?;
    let graph = cache.graph()?;
    check_top_k(config, graph.node_count())?;
    let load_secs = started.elapsed().as_secs_f64();

    let solve_started = Instant::now();
    let result = page_rank(&graph, &config.solver().pagerank())?;
    let solve_secs = solve_started.elapsed().as_secs_f64();
    let score_sum = result.sum();
    info!("Proof of correctness: sum of scores = {}", score_sum);

    ensure_output_dir(config)?;
    let result_path = config.pagerank_result_path();
    write_score_files(&[(result_path.as_path(), result.scores.as_slice())])?;

    let top_k = config
        .top_k()
        .map(|k| jaccard_summary(config, ScoreKind::PageRank, &result.scores, graph.transposed(), k))
        .transpose()?;

    Ok(PageRankReport {
        dataset: config.dataset().clone(),
        cache_dir,
        cache_hit,
        graph: *cache.metadata(),
        iterations: result.iterations,
        residual: result.residual,
        converged: result.converged(config.solver().tolerance),
        score_sum,
        load_secs,
        solve_secs,
        result_path,
        top_k,
    })
}

/// Rank the dataset with HITS
pub fn run_hits(config: &RunConfig) -> RankResult<HitsReport> {
    let started = Instant::now();
    let cache_dir = config.cache_dir(Algorithm::Hits);
    let cache_hit = ensure_cache(config, Algorithm::Hits, compress_hits)?;

    let cache = HitsCache::open(&cache_dir)?;
    let graph = cache.graph()?;
    check_top_k(config, graph.node_count())?;
    let load_secs = started.elapsed().as_secs_f64();

    let solve_started = Instant::now();
    let result = hits(&graph, &config.solver().hits())?;
    let solve_secs = solve_started.elapsed().as_secs_f64();
    let authority_sum = result.authority_sum();
    let hub_sum = result.hub_sum();
    info!(
        "Proof of correctness: authority sum = {}, hub sum = {}",
        authority_sum, hub_sum
    );

    ensure_output_dir(config)?;
    let authority_path = config.authority_result_path();
    let hub_path = config.hub_result_path();
    write_score_files(&[
        (authority_path.as_path(), result.authorities.as_slice()),
        (hub_path.as_path(), result.hubs.as_slice()),
    ])?;

    let (top_authorities, top_hubs) = match config.top_k() {
        Some(k) => {
            let transposed = graph.transposed();
            let a = jaccard_summary(config, ScoreKind::Authority, &result.authorities, transposed, k)?;
            let h = jaccard_summary(config, ScoreKind::Hub, &result.hubs, transposed, k)?;
            (Some(a), Some(h))
        }
        None => (None, None),
    };

    Ok(HitsReport {
        dataset: config.dataset().clone(),
        cache_dir,
        cache_hit,
        graph: *cache.metadata(),
        iterations: result.iterations,
        authority_residual: result.authority_residual,
        hub_residual: result.hub_residual,
        converged: result.converged(config.solver().tolerance),
        authority_sum,
        hub_sum,
        load_secs,
        solve_secs,
        authority_path,
        hub_path,
        top_authorities,
        top_hubs,
    })
}

/// Map an existing cache and report its dimensions.
///
/// A cache that fails to map is removed, as on a solver run.
pub fn inspect_cache(config: &RunConfig, algorithm: Algorithm) -> RankResult<CacheReport> {
    let cache_dir = config.cache_dir(algorithm);
    if !cache_exists(&cache_dir) {
        return Err(RankError::Config(format!(
            "no {} cache for dataset {} at {:?}",
            algorithm,
            config.dataset(),
            cache_dir
        )));
    }

    let graph = match algorithm {
        Algorithm::PageRank => *PageRankCache::open(&cache_dir)?.metadata(),
        Algorithm::Hits => *HitsCache::open(&cache_dir)?.metadata(),
    };

    Ok(CacheReport {
        algorithm,
        dataset: config.dataset().clone(),
        cache_dir,
        graph,
    })
}
