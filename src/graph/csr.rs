//! Owned CSR structures produced by the builder

use linkrank_algorithms::{AlgoResult, CsrView, HitsGraph, PageRankGraph};

/// Graph dimensions, persisted as the cache metadata file
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GraphMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    /// Only tracked for PageRank caches
    pub dangling_count: Option<usize>,
}

/// Heap-allocated CSR matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    pub row_ptr: Vec<i32>,
    pub col_ind: Vec<i32>,
    pub val: Option<Vec<f64>>,
}

impl CsrMatrix {
    pub fn node_count(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    pub fn edge_count(&self) -> usize {
        self.col_ind.len()
    }

    pub fn view(&self) -> AlgoResult<CsrView<'_>> {
        CsrView::new(&self.row_ptr, &self.col_ind, self.val.as_deref())
    }
}

/// PageRank input: weighted destination-keyed matrix plus dangling nodes
#[derive(Debug, Clone)]
pub struct PageRankCsr {
    pub transposed: CsrMatrix,
    pub danglings: Vec<i32>,
}

impl PageRankCsr {
    pub fn metadata(&self) -> GraphMetadata {
        GraphMetadata {
            node_count: self.transposed.node_count(),
            edge_count: self.transposed.edge_count(),
            dangling_count: Some(self.danglings.len()),
        }
    }

    pub fn graph(&self) -> AlgoResult<PageRankGraph<'_>> {
        PageRankGraph::new(self.transposed.view()?, &self.danglings)
    }
}

/// HITS input: source-keyed and destination-keyed matrices of one edge set
#[derive(Debug, Clone)]
pub struct HitsCsr {
    pub forward: CsrMatrix,
    pub transposed: CsrMatrix,
}

impl HitsCsr {
    pub fn metadata(&self) -> GraphMetadata {
        GraphMetadata {
            node_count: self.forward.node_count(),
            edge_count: self.forward.edge_count(),
            dangling_count: None,
        }
    }

    pub fn graph(&self) -> AlgoResult<HitsGraph<'_>> {
        HitsGraph::new(self.forward.view()?, self.transposed.view()?)
    }
}
