pub mod common;
pub mod error;
pub mod hits;
pub mod jaccard;
pub mod pagerank;
pub mod sort;
pub mod topk;

pub use common::{CsrView, Edge, HitsGraph, NodeId, PageRankGraph};
pub use error::{try_filled, try_with_capacity, AlgoError, AlgoResult};
pub use hits::{hits, HitsConfig, HitsResult};
pub use jaccard::{jaccard_coefficient, top_k_jaccard, JaccardReport};
pub use pagerank::{page_rank, PageRankConfig, PageRankResult};
pub use sort::{is_sorted_by_target, sort_edges};
pub use topk::top_k;
