//! Per-run configuration
//!
//! A `RunConfig` is built once from the dataset path and the command-line
//! options, then passed by reference to the builder, the persistence layer
//! and the solvers. It also owns every derived path (cache directories,
//! result files, Jaccard reports).

use crate::error::{RankError, RankResult};
use linkrank_algorithms::{HitsConfig, PageRankConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which solver a cache or result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    PageRank,
    Hits,
}

impl Algorithm {
    /// Prefix of the cache directory name
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Algorithm::PageRank => "PR",
            Algorithm::Hits => "HITS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::PageRank => write!(f, "pagerank"),
            Algorithm::Hits => write!(f, "hits"),
        }
    }
}

/// Numerical settings shared by both solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// PageRank damping factor
    pub damping: f64,
    /// L2 convergence threshold
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Iterations between progress log lines
    pub progress_interval: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-10,
            max_iterations: 200,
            progress_interval: 10,
        }
    }
}

impl SolverSettings {
    /// Load settings from a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RankResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
            .map_err(|e| RankError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, String> {
        let settings: SolverSettings = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(format!("damping must be in [0, 1], got {}", self.damping));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(format!("tolerance must be a non-negative number, got {}", self.tolerance));
        }
        Ok(())
    }

    pub fn pagerank(&self) -> PageRankConfig {
        PageRankConfig {
            damping_factor: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            progress_interval: self.progress_interval,
        }
    }

    pub fn hits(&self) -> HitsConfig {
        HitsConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            progress_interval: self.progress_interval,
        }
    }
}

/// Validated dataset identity, used as the cache key and result file prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> RankResult<Self> {
        let id = id.into();
        if id.is_empty() || id == "." || id == ".." {
            return Err(RankError::Config(format!("invalid dataset id {:?}", id)));
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(RankError::Config(format!(
                "dataset id {:?} contains unsupported character {:?}",
                id, bad
            )));
        }
        Ok(Self(id))
    }

    /// Derive the id from the dataset file name: `data/web-Google.txt` -> `web-Google`
    pub fn from_path(path: impl AsRef<Path>) -> RankResult<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RankError::Config(format!("cannot derive a dataset id from {:?}", path)))?;
        Self::new(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable configuration of a single run
#[derive(Debug, Clone)]
pub struct RunConfig {
    input: PathBuf,
    dataset: DatasetId,
    cache_root: PathBuf,
    output_dir: PathBuf,
    top_k: Option<usize>,
    solver: SolverSettings,
}

impl RunConfig {
    /// Configuration for `input` with the id derived from its file name,
    /// caches and results in the current directory and default solver settings
    pub fn new(input: impl Into<PathBuf>) -> RankResult<Self> {
        let input = input.into();
        let dataset = DatasetId::from_path(&input)?;
        Ok(Self {
            input,
            dataset,
            cache_root: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            top_k: None,
            solver: SolverSettings::default(),
        })
    }

    pub fn with_dataset(mut self, dataset: DatasetId) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = root.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_top_k(mut self, k: Option<usize>) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_solver(mut self, solver: SolverSettings) -> RankResult<Self> {
        solver.validate().map_err(RankError::Config)?;
        self.solver = solver;
        Ok(self)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn dataset(&self) -> &DatasetId {
        &self.dataset
    }

    pub fn top_k(&self) -> Option<usize> {
        self.top_k
    }

    pub fn solver(&self) -> &SolverSettings {
        &self.solver
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<cache_root>/PR_<id>` or `<cache_root>/HITS_<id>`
    pub fn cache_dir(&self, algorithm: Algorithm) -> PathBuf {
        self.cache_root
            .join(format!("{}_{}", algorithm.cache_prefix(), self.dataset))
    }

    /// `<output_dir>/<id>.pr`
    pub fn pagerank_result_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.pr", self.dataset))
    }

    /// `<output_dir>/<id>_a.hits`
    pub fn authority_result_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_a.hits", self.dataset))
    }

    /// `<output_dir>/<id>_h.hits`
    pub fn hub_result_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_h.hits", self.dataset))
    }

    /// `<output_dir>/<id>_<method>_k<K>.csv`
    pub fn jaccard_report_path(&self, method: &str, k: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_k{}.csv", self.dataset, method, k))
    }
}
