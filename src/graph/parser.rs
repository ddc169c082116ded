//! Edge-list reader
//!
//! Input layout (SNAP style):
//!
//! ```text
//! # Directed graph (each unordered pair of nodes is saved once): web-Google.txt
//! # Webgraph from the Google programming contest, 2002
//! # Nodes: 875713 Edges: 5105039
//! # FromNodeId	ToNodeId
//! 0	11342
//! ...
//! ```
//!
//! Lines 1, 2 and 4 are ignored, line 3 carries the dimensions, then exactly
//! M lines of `<from> <to>` follow.

use crate::error::{RankError, RankResult};
use linkrank_algorithms::{try_with_capacity, Edge};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const HEADER_LINE: usize = 3;
const FIRST_EDGE_LINE: usize = 5;
const PROGRESS_EVERY: usize = 1_000_000;

/// Dimensions declared on the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphHeader {
    pub node_count: usize,
    pub edge_count: usize,
}

/// A parsed edge list in input order
#[derive(Debug, Clone)]
pub struct EdgeList {
    pub header: GraphHeader,
    pub edges: Vec<Edge>,
}

struct LineParser<'a> {
    path: &'a Path,
}

impl LineParser<'_> {
    fn malformed(&self, line: usize, reason: impl Into<String>) -> RankError {
        RankError::MalformedInput {
            path: self.path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    fn header(&self, text: &str) -> RankResult<GraphHeader> {
        let re = Regex::new(r"^#\s*Nodes:\s*(\d+)\s+Edges:\s*(\d+)")
            .map_err(|e| self.malformed(HEADER_LINE, e.to_string()))?;
        let caps = re.captures(text.trim()).ok_or_else(|| {
            self.malformed(HEADER_LINE, format!("expected '# Nodes: <N> Edges: <M>', found {:?}", text))
        })?;

        let dim = |idx: usize, name: &str| -> RankResult<usize> {
            let value: usize = caps[idx]
                .parse()
                .map_err(|_| self.malformed(HEADER_LINE, format!("{} count {:?} is not a number", name, &caps[idx])))?;
            // Offsets and ids are stored as 32-bit integers
            if value > i32::MAX as usize {
                return Err(self.malformed(HEADER_LINE, format!("{} count {} exceeds {}", name, value, i32::MAX)));
            }
            Ok(value)
        };

        Ok(GraphHeader {
            node_count: dim(1, "node")?,
            edge_count: dim(2, "edge")?,
        })
    }

    fn edge(&self, line: usize, text: &str, node_count: usize) -> RankResult<Edge> {
        let mut fields = text.split_whitespace();
        let mut id = |name: &str| -> RankResult<i32> {
            let token = fields
                .next()
                .ok_or_else(|| self.malformed(line, format!("missing {} node id", name)))?;
            let value: i64 = token
                .parse()
                .map_err(|_| self.malformed(line, format!("{} node id {:?} is not an integer", name, token)))?;
            if value < 0 || value as usize >= node_count {
                return Err(self.malformed(
                    line,
                    format!("{} node id {} outside of [0, {})", name, value, node_count),
                ));
            }
            Ok(value as i32)
        };
        let source = id("source")?;
        let target = id("target")?;
        if let Some(extra) = fields.next() {
            return Err(self.malformed(line, format!("unexpected trailing token {:?}", extra)));
        }
        Ok(Edge::new(source, target))
    }
}

/// Parse an edge list from any buffered reader. `path` is only used in
/// error messages.
pub fn parse_edge_list<R: BufRead>(reader: R, path: &Path) -> RankResult<EdgeList> {
    let parser = LineParser { path };
    let io_err = |source| RankError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut lines = reader.lines();
    let mut header = None;
    for line_no in 1..FIRST_EDGE_LINE {
        let text = lines
            .next()
            .transpose()
            .map_err(io_err)?
            .ok_or_else(|| parser.malformed(line_no, "unexpected end of file in header"))?;
        if line_no == HEADER_LINE {
            header = Some(parser.header(&text)?);
        }
    }
    let header = header.ok_or_else(|| parser.malformed(HEADER_LINE, "missing header"))?;
    info!(
        "This graph has {} nodes and {} edges",
        header.node_count, header.edge_count
    );

    let mut edges: Vec<Edge> = try_with_capacity("edge list", header.edge_count)?;
    for (offset, text) in lines.enumerate() {
        let line_no = FIRST_EDGE_LINE + offset;
        let text = text.map_err(io_err)?;
        if text.trim().is_empty() {
            continue;
        }
        if edges.len() == header.edge_count {
            return Err(parser.malformed(
                line_no,
                format!("more edge lines than the {} declared", header.edge_count),
            ));
        }
        edges.push(parser.edge(line_no, &text, header.node_count)?);
        if edges.len() % PROGRESS_EVERY == 0 {
            debug!("Edge {}/{}", edges.len(), header.edge_count);
        }
    }

    if edges.len() != header.edge_count {
        return Err(parser.malformed(
            FIRST_EDGE_LINE + edges.len(),
            format!("found {} edge lines, header declares {}", edges.len(), header.edge_count),
        ));
    }

    Ok(EdgeList { header, edges })
}

/// Open and parse an edge-list file
pub fn read_edge_list(path: impl AsRef<Path>) -> RankResult<EdgeList> {
    let path = path.as_ref();
    info!("Parsing input data {:?}", path);
    let file = File::open(path).map_err(|source| RankError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    parse_edge_list(BufReader::new(file), path)
}
