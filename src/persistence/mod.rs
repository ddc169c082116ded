//! On-disk layer
//!
//! - `storage`: flat binary arrays and read-only typed mappings over them
//! - `artifact`: the per-dataset cache directories consumed by the solvers
//! - `results`: score vectors and Jaccard reports produced by a run

pub mod artifact;
pub mod results;
pub mod storage;

pub use artifact::{
    cache_exists, read_metadata, write_hits_cache, write_pagerank_cache, HitsCache, PageRankCache,
};
pub use results::{read_scores, write_jaccard_csv, write_score_files};
pub use storage::{read_i32_file, write_array, MappedArray, StorageError, StorageResult};
