//! Cache artifacts: one directory of fixed-name binary files per dataset
//!
//! | file            | contents                         |
//! |-----------------|----------------------------------|
//! | `metadata.bin`  | `[N, M, D]` (PageRank) / `[N, M]` (HITS) as i32 |
//! | `row_ptr.bin`   | N+1 i32                          |
//! | `col_ind.bin`   | M i32                            |
//! | `row_ptr_t.bin` | N+1 i32 (HITS, destination-keyed)|
//! | `col_ind_t.bin` | M i32 (HITS, destination-keyed)  |
//! | `val.bin`       | M f64 (PageRank)                 |
//! | `danglings.bin` | D i32 (PageRank, ascending)      |
//!
//! For PageRank `row_ptr.bin`/`col_ind.bin` hold the destination-keyed
//! matrix, which is the only one it needs.
//!
//! The directory's existence is the cache-hit signal, so it only ever
//! appears complete: files go to `<dir>.partial` first and the directory is
//! renamed into place once every file is on disk.

use super::storage::{io_error, read_i32_file, write_array, MappedArray, StorageError, StorageResult};
use crate::error::{RankError, RankResult};
use crate::graph::{GraphMetadata, HitsCsr, PageRankCsr};
use linkrank_algorithms::{AlgoResult, CsrView, HitsGraph, PageRankGraph};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const METADATA_FILE: &str = "metadata.bin";
pub const ROW_PTR_FILE: &str = "row_ptr.bin";
pub const COL_IND_FILE: &str = "col_ind.bin";
pub const ROW_PTR_T_FILE: &str = "row_ptr_t.bin";
pub const COL_IND_T_FILE: &str = "col_ind_t.bin";
pub const VAL_FILE: &str = "val.bin";
pub const DANGLINGS_FILE: &str = "danglings.bin";

const STAGING_SUFFIX: &str = "partial";

/// `true` when a cache directory for this dataset already exists
pub fn cache_exists(dir: &Path) -> bool {
    dir.is_dir()
}

/// Remove a directory tree, logging instead of failing
pub fn remove_dir_quietly(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {:?}: {}", dir, e);
        }
    }
}

fn staging_dir(dir: &Path) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.with_file_name(format!("{}.{}", name, STAGING_SUFFIX))
}

/// Run `write` against a fresh staging directory and move it to `dir` on
/// success. Any failure deletes the staging directory.
fn write_all_or_nothing(
    dir: &Path,
    write: impl FnOnce(&Path) -> StorageResult<()>,
) -> RankResult<()> {
    let staging = staging_dir(dir);
    remove_dir_quietly(&staging);

    let outcome = fs::create_dir_all(&staging)
        .map_err(io_error(&staging))
        .and_then(|_| write(&staging))
        .and_then(|_| fs::rename(&staging, dir).map_err(io_error(dir)));

    match outcome {
        Ok(()) => {
            info!("Cache written to {:?}", dir);
            Ok(())
        }
        Err(source) => {
            remove_dir_quietly(&staging);
            Err(RankError::Serialization {
                path: dir.to_path_buf(),
                source,
            })
        }
    }
}

fn metadata_ints(path: &Path, meta: &GraphMetadata) -> StorageResult<Vec<i32>> {
    let to_i32 = |value: usize, name: &str| {
        i32::try_from(value).map_err(|_| StorageError::Metadata {
            path: path.to_path_buf(),
            reason: format!("{} {} does not fit in 32 bits", name, value),
        })
    };
    let mut ints = vec![
        to_i32(meta.node_count, "node count")?,
        to_i32(meta.edge_count, "edge count")?,
    ];
    if let Some(d) = meta.dangling_count {
        ints.push(to_i32(d, "dangling count")?);
    }
    Ok(ints)
}

/// Read `metadata.bin`; `with_danglings` selects the 3-field PageRank layout
pub fn read_metadata(dir: &Path, with_danglings: bool) -> StorageResult<GraphMetadata> {
    let path = dir.join(METADATA_FILE);
    let ints = read_i32_file(&path)?;
    let expected = if with_danglings { 3 } else { 2 };
    if ints.len() != expected {
        return Err(StorageError::Metadata {
            path,
            reason: format!("expected {} values, found {}", expected, ints.len()),
        });
    }
    if let Some(&negative) = ints.iter().find(|&&v| v < 0) {
        return Err(StorageError::Metadata {
            path,
            reason: format!("negative count {}", negative),
        });
    }
    Ok(GraphMetadata {
        node_count: ints[0] as usize,
        edge_count: ints[1] as usize,
        dangling_count: with_danglings.then(|| ints[2] as usize),
    })
}

/// Persist a PageRank cache to `dir`
pub fn write_pagerank_cache(dir: &Path, csr: &PageRankCsr) -> RankResult<()> {
    write_all_or_nothing(dir, |staging| {
        let meta_path = staging.join(METADATA_FILE);
        let meta = metadata_ints(&meta_path, &csr.metadata())?;
        let val = csr.transposed.val.as_deref().unwrap_or_default();

        write_array(&staging.join(ROW_PTR_FILE), &csr.transposed.row_ptr)?;
        write_array(&staging.join(COL_IND_FILE), &csr.transposed.col_ind)?;
        write_array(&staging.join(VAL_FILE), val)?;
        write_array(&staging.join(DANGLINGS_FILE), &csr.danglings)?;
        write_array(&meta_path, &meta)
    })
}

/// Persist a HITS cache to `dir`
pub fn write_hits_cache(dir: &Path, csr: &HitsCsr) -> RankResult<()> {
    write_all_or_nothing(dir, |staging| {
        let meta_path = staging.join(METADATA_FILE);
        let meta = metadata_ints(&meta_path, &csr.metadata())?;

        write_array(&staging.join(ROW_PTR_FILE), &csr.forward.row_ptr)?;
        write_array(&staging.join(COL_IND_FILE), &csr.forward.col_ind)?;
        write_array(&staging.join(ROW_PTR_T_FILE), &csr.transposed.row_ptr)?;
        write_array(&staging.join(COL_IND_T_FILE), &csr.transposed.col_ind)?;
        write_array(&meta_path, &meta)
    })
}

/// Turn a load failure into a `Mapping` error, deleting the corrupt cache
fn discard_corrupt(dir: &Path, source: StorageError) -> RankError {
    warn!(
        "Cache {:?} could not be loaded ({}); the directory will be removed",
        dir, source
    );
    remove_dir_quietly(dir);
    RankError::Mapping {
        path: dir.to_path_buf(),
        source,
    }
}

fn invalid_graph(dir: &Path) -> impl FnOnce(linkrank_algorithms::AlgoError) -> StorageError + '_ {
    move |source| StorageError::InvalidGraph {
        path: dir.to_path_buf(),
        source,
    }
}

/// Memory-mapped PageRank cache
#[derive(Debug)]
pub struct PageRankCache {
    metadata: GraphMetadata,
    row_ptr: MappedArray<i32>,
    col_ind: MappedArray<i32>,
    val: MappedArray<f64>,
    danglings: MappedArray<i32>,
}

impl PageRankCache {
    /// Map every file of the cache. On failure the directory is deleted.
    pub fn open(dir: &Path) -> RankResult<Self> {
        Self::map(dir).map_err(|source| discard_corrupt(dir, source))
    }

    fn map(dir: &Path) -> StorageResult<Self> {
        let metadata = read_metadata(dir, true)?;
        let n = metadata.node_count;
        let m = metadata.edge_count;
        let d = metadata.dangling_count.unwrap_or(0);
        info!("Mapping PageRank cache {:?}: {} nodes, {} edges, {} dangling", dir, n, m, d);

        let cache = Self {
            metadata,
            row_ptr: MappedArray::load(&dir.join(ROW_PTR_FILE), n + 1)?,
            col_ind: MappedArray::load(&dir.join(COL_IND_FILE), m)?,
            val: MappedArray::load(&dir.join(VAL_FILE), m)?,
            danglings: MappedArray::load(&dir.join(DANGLINGS_FILE), d)?,
        };
        cache.graph().map_err(invalid_graph(dir))?;
        Ok(cache)
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    /// Borrowed solver input over the mapped arrays
    pub fn graph(&self) -> AlgoResult<PageRankGraph<'_>> {
        let transposed = CsrView::new(
            self.row_ptr.as_slice(),
            self.col_ind.as_slice(),
            Some(self.val.as_slice()),
        )?;
        PageRankGraph::new(transposed, self.danglings.as_slice())
    }
}

/// Memory-mapped HITS cache
#[derive(Debug)]
pub struct HitsCache {
    metadata: GraphMetadata,
    row_ptr: MappedArray<i32>,
    col_ind: MappedArray<i32>,
    row_ptr_t: MappedArray<i32>,
    col_ind_t: MappedArray<i32>,
}

impl HitsCache {
    /// Map every file of the cache. On failure the directory is deleted.
    pub fn open(dir: &Path) -> RankResult<Self> {
        Self::map(dir).map_err(|source| discard_corrupt(dir, source))
    }

    fn map(dir: &Path) -> StorageResult<Self> {
        let metadata = read_metadata(dir, false)?;
        let n = metadata.node_count;
        let m = metadata.edge_count;
        info!("Mapping HITS cache {:?}: {} nodes, {} edges", dir, n, m);

        let cache = Self {
            metadata,
            row_ptr: MappedArray::load(&dir.join(ROW_PTR_FILE), n + 1)?,
            col_ind: MappedArray::load(&dir.join(COL_IND_FILE), m)?,
            row_ptr_t: MappedArray::load(&dir.join(ROW_PTR_T_FILE), n + 1)?,
            col_ind_t: MappedArray::load(&dir.join(COL_IND_T_FILE), m)?,
        };
        cache.graph().map_err(invalid_graph(dir))?;
        Ok(cache)
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn graph(&self) -> AlgoResult<HitsGraph<'_>> {
        let forward = CsrView::new(self.row_ptr.as_slice(), self.col_ind.as_slice(), None)?;
        let transposed = CsrView::new(self.row_ptr_t.as_slice(), self.col_ind_t.as_slice(), None)?;
        HitsGraph::new(forward, transposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_hits, build_pagerank, EdgeList, GraphHeader};
    use linkrank_algorithms::Edge;
    use tempfile::TempDir;

    fn sample() -> EdgeList {
        let pairs = [(0, 1), (1, 2), (2, 0), (0, 2), (3, 2)];
        EdgeList {
            header: GraphHeader {
                node_count: 5,
                edge_count: pairs.len(),
            },
            edges: pairs.iter().map(|&(s, t)| Edge::new(s, t)).collect(),
        }
    }

    #[test]
    fn test_pagerank_cache_round_trip() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("PR_sample");
        let csr = build_pagerank(sample()).unwrap();

        assert!(!cache_exists(&dir));
        write_pagerank_cache(&dir, &csr).unwrap();
        assert!(cache_exists(&dir));
        assert!(!staging_dir(&dir).exists());

        let cache = PageRankCache::open(&dir).unwrap();
        assert_eq!(cache.metadata(), &csr.metadata());
        let graph = cache.graph().unwrap();
        assert_eq!(graph.transposed().row_ptr(), csr.transposed.row_ptr.as_slice());
        assert_eq!(graph.transposed().col_ind(), csr.transposed.col_ind.as_slice());
        assert_eq!(graph.transposed().values(), csr.transposed.val.as_deref());
        // Node 4 has no out-edges
        assert_eq!(graph.danglings(), &[4]);
    }

    #[test]
    fn test_hits_cache_round_trip() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("HITS_sample");
        let csr = build_hits(sample()).unwrap();
        write_hits_cache(&dir, &csr).unwrap();

        let cache = HitsCache::open(&dir).unwrap();
        assert_eq!(cache.metadata().dangling_count, None);
        let graph = cache.graph().unwrap();
        assert_eq!(graph.successors(0), &[1, 2]);
        assert_eq!(graph.predecessors(2), &[0, 1, 3]);
    }

    #[test]
    fn test_truncated_cache_is_deleted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("PR_sample");
        write_pagerank_cache(&dir, &build_pagerank(sample()).unwrap()).unwrap();

        fs::write(dir.join(VAL_FILE), [0u8; 3]).unwrap();
        let err = PageRankCache::open(&dir).unwrap_err();
        assert!(matches!(
            err,
            RankError::Mapping {
                source: StorageError::Truncated { .. },
                ..
            }
        ));
        assert!(!cache_exists(&dir));
    }

    #[test]
    fn test_missing_file_is_deleted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("HITS_sample");
        write_hits_cache(&dir, &build_hits(sample()).unwrap()).unwrap();

        fs::remove_file(dir.join(COL_IND_T_FILE)).unwrap();
        assert!(matches!(
            HitsCache::open(&dir),
            Err(RankError::Mapping {
                source: StorageError::Missing(_),
                ..
            })
        ));
        assert!(!cache_exists(&dir));
    }

    #[test]
    fn test_corrupt_row_pointers_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("HITS_sample");
        write_hits_cache(&dir, &build_hits(sample()).unwrap()).unwrap();

        // Same size, decreasing offsets
        write_array(&dir.join(ROW_PTR_FILE), &[0i32, 5, 1, 1, 1, 5]).unwrap();
        assert!(matches!(
            HitsCache::open(&dir),
            Err(RankError::Mapping {
                source: StorageError::InvalidGraph { .. },
                ..
            })
        ));
        assert!(!cache_exists(&dir));
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let tmp = TempDir::new().unwrap();
        // The parent of the cache directory is a regular file
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let dir = blocker.join("PR_sample");

        let err = write_pagerank_cache(&dir, &build_pagerank(sample()).unwrap()).unwrap_err();
        assert!(matches!(err, RankError::Serialization { .. }));
        assert!(!cache_exists(&dir));
        assert!(!staging_dir(&dir).exists());
    }

    #[test]
    fn test_stale_staging_directory_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("PR_sample");
        let staging = staging_dir(&dir);
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("junk"), b"junk").unwrap();

        write_pagerank_cache(&dir, &build_pagerank(sample()).unwrap()).unwrap();
        assert!(!dir.join("junk").exists());
        assert!(!staging.exists());
    }
}
