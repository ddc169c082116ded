//! Score vectors and Jaccard reports written after a solve
//!
//! Score files are raw native `f64` arrays, one value per node in id order.
//! A run writes all of its files or none of them: when any write fails the
//! files already produced by that run are removed again.

use super::storage::{io_error, write_array, StorageError, StorageResult};
use crate::error::{RankError, RankResult};
use linkrank_algorithms::JaccardReport;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::mem::size_of;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn remove_partial(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove partial result {:?}: {}", path, e);
            }
        }
    }
}

/// Write each `(path, scores)` pair as a raw f64 file
pub fn write_score_files(outputs: &[(&Path, &[f64])]) -> RankResult<()> {
    let mut written = Vec::with_capacity(outputs.len());
    for &(path, scores) in outputs {
        written.push(path.to_path_buf());
        if let Err(source) = write_array(path, scores) {
            remove_partial(&written);
            return Err(RankError::ResultWrite {
                path: path.to_path_buf(),
                source,
            });
        }
        info!("Wrote {} scores to {:?}", scores.len(), path);
    }
    Ok(())
}

/// Read a score file back into memory
pub fn read_scores(path: &Path) -> StorageResult<Vec<f64>> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StorageError::Missing(path.to_path_buf()),
        _ => StorageError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    if bytes.len() % size_of::<f64>() != 0 {
        return Err(StorageError::Layout {
            path: path.to_path_buf(),
            type_name: "f64",
            reason: format!("length {} is not a multiple of 8", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(size_of::<f64>())
        .map(bytemuck::pod_read_unaligned::<f64>)
        .collect())
}

/// Write a Jaccard report as CSV (`n1,n2,jac`)
pub fn write_jaccard_csv(path: &Path, report: &JaccardReport) -> RankResult<()> {
    let outcome = File::create(path)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            report.write_csv(&mut writer)?;
            writer.flush()
        })
        .map_err(io_error(path));

    match outcome {
        Ok(()) => {
            info!("Wrote Jaccard report for top {} nodes to {:?}", report.k(), path);
            Ok(())
        }
        Err(source) => {
            remove_partial(&[path.to_path_buf()]);
            Err(RankError::ResultWrite {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
