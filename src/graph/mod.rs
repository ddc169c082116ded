//! Graph compression
//!
//! Turns a text edge list into the CSR structures the solvers consume:
//! - `parser`: header + edge lines -> `EdgeList`
//! - `builder`: `EdgeList` -> `PageRankCsr` / `HitsCsr`
//! - `csr`: owned CSR containers and graph metadata

pub mod builder;
pub mod csr;
pub mod parser;

pub use builder::{build_hits, build_pagerank};
pub use csr::{CsrMatrix, GraphMetadata, HitsCsr, PageRankCsr};
pub use parser::{parse_edge_list, read_edge_list, EdgeList, GraphHeader};
