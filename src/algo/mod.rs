//! Solver integration
//!
//! The algorithms live in `linkrank-algorithms` and only see borrowed CSR
//! views. This module is the adapter layer: it re-exports them and turns a
//! Jaccard report into the serializable summary carried by run reports.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use linkrank_algorithms::{
    hits, jaccard_coefficient, page_rank, sort_edges, top_k, top_k_jaccard, HitsConfig,
    HitsResult, JaccardReport, NodeId, PageRankConfig, PageRankResult,
};

/// Score vector a Top-K report was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    PageRank,
    Authority,
    Hub,
}

impl ScoreKind {
    /// Short tag used in report file names
    pub fn tag(&self) -> &'static str {
        match self {
            ScoreKind::PageRank => "pr",
            ScoreKind::Authority => "a",
            ScoreKind::Hub => "h",
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKind::PageRank => write!(f, "PageRank"),
            ScoreKind::Authority => write!(f, "Authority"),
            ScoreKind::Hub => write!(f, "Hub"),
        }
    }
}

/// One row of a Top-K table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub rank: usize,
    pub node: NodeId,
    pub score: f64,
    pub in_degree: usize,
}

/// Top-K nodes of one score vector and where their Jaccard table went
#[derive(Debug, Clone, Serialize)]
pub struct TopKSummary {
    pub kind: ScoreKind,
    pub k: usize,
    pub nodes: Vec<RankedNode>,
    pub report_path: PathBuf,
}

impl TopKSummary {
    pub fn from_report(kind: ScoreKind, report: &JaccardReport, report_path: PathBuf) -> Self {
        let nodes = report
            .nodes
            .iter()
            .zip(&report.scores)
            .zip(&report.degrees)
            .enumerate()
            .map(|(i, ((&node, &score), &in_degree))| RankedNode {
                rank: i + 1,
                node,
                score,
                in_degree,
            })
            .collect();
        Self {
            kind,
            k: report.k(),
            nodes,
            report_path,
        }
    }
}
