//! Edge list -> CSR compression
//!
//! PageRank needs a single destination-keyed matrix weighted by
//! `1/outdeg(source)` and the dangling set. HITS needs the unweighted
//! source-keyed matrix and its destination-keyed transpose.

use super::csr::{CsrMatrix, HitsCsr, PageRankCsr};
use super::parser::EdgeList;
use crate::error::RankResult;
use linkrank_algorithms::{sort_edges, try_filled, try_with_capacity, Edge};
use tracing::info;

/// Row pointers from a stream of row keys that is already grouped in
/// ascending order.
///
/// Walks the keys once with a cursor `ri`: whenever the row of position `ci`
/// is past `ri`, the offsets of every row in between are set to `ci`. Rows
/// after the last key are filled with M.
fn backfill_row_ptr(rows: impl Iterator<Item = i32>, node_count: usize, edge_count: usize) -> RankResult<Vec<i32>> {
    let mut row_ptr = try_filled("row pointers", node_count + 1, 0i32)?;
    let mut ri = 0usize;
    let mut consumed = 0usize;

    for (ci, row) in rows.enumerate() {
        let row = row as usize;
        if row > ri {
            for slot in &mut row_ptr[ri + 1..=row] {
                *slot = ci as i32;
            }
            ri = row;
        }
        consumed = ci + 1;
    }
    debug_assert_eq!(consumed, edge_count);

    for slot in &mut row_ptr[ri + 1..] {
        *slot = edge_count as i32;
    }
    Ok(row_ptr)
}

/// Per-node out-degree
fn out_degrees(edges: &[Edge], node_count: usize) -> RankResult<Vec<i32>> {
    let mut degrees = try_filled("out-degrees", node_count, 0i32)?;
    for edge in edges {
        degrees[edge.source as usize] += 1;
    }
    Ok(degrees)
}

/// Destination-keyed matrix from edges sorted by `(target, source)`; the
/// source of every edge becomes the column index. With `out_links`, each
/// edge is weighted by `1/outdeg(source)`.
fn transposed_from_sorted(
    sorted: &[Edge],
    node_count: usize,
    out_links: Option<&[i32]>,
) -> RankResult<CsrMatrix> {
    let row_ptr = backfill_row_ptr(sorted.iter().map(|e| e.target), node_count, sorted.len())?;

    let mut col_ind = try_with_capacity("column indices", sorted.len())?;
    col_ind.extend(sorted.iter().map(|e| e.source));

    let val = match out_links {
        Some(out_links) => {
            let mut val = try_with_capacity("edge weights", sorted.len())?;
            val.extend(
                sorted
                    .iter()
                    .map(|e| 1.0 / out_links[e.source as usize] as f64),
            );
            Some(val)
        }
        None => None,
    };

    Ok(CsrMatrix { row_ptr, col_ind, val })
}

/// Compress an edge list into the PageRank layout.
pub fn build_pagerank(list: EdgeList) -> RankResult<PageRankCsr> {
    let n = list.header.node_count;
    let m = list.header.edge_count;

    let out_links = out_degrees(&list.edges, n)?;

    let mut danglings = try_with_capacity("dangling set", out_links.iter().filter(|&&d| d == 0).count())?;
    danglings.extend(
        out_links
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i as i32),
    );

    info!("Sorting {} edges", m);
    let sorted = sort_edges(list.edges)?;

    let transposed = transposed_from_sorted(&sorted, n, Some(&out_links))?;
    info!("CSR matrix filled ({} dangling nodes)", danglings.len());

    Ok(PageRankCsr {
        transposed,
        danglings,
    })
}

/// Compress an edge list into the HITS layout.
pub fn build_hits(list: EdgeList) -> RankResult<HitsCsr> {
    let n = list.header.node_count;
    let m = list.header.edge_count;

    // Source-keyed rows by counting: prefix sums of the out-degrees give the
    // row offsets, then edges are scattered in input order.
    let degrees = out_degrees(&list.edges, n)?;
    let mut row_ptr = try_filled("row pointers", n + 1, 0i32)?;
    for (i, &d) in degrees.iter().enumerate() {
        row_ptr[i + 1] = row_ptr[i] + d;
    }
    let mut cursor = try_with_capacity("row cursors", n)?;
    cursor.extend_from_slice(&row_ptr[..n]);
    let mut col_ind = try_filled("column indices", m, 0i32)?;
    for edge in &list.edges {
        let slot = &mut cursor[edge.source as usize];
        col_ind[*slot as usize] = edge.target;
        *slot += 1;
    }
    let forward = CsrMatrix {
        row_ptr,
        col_ind,
        val: None,
    };
    info!("Forward CSR matrix filled");

    info!("Sorting {} edges for the transposed matrix", m);
    let sorted = sort_edges(list.edges)?;
    let transposed = transposed_from_sorted(&sorted, n, None)?;
    info!("Transposed CSR matrix filled");

    Ok(HitsCsr {
        forward,
        transposed,
    })
}
