//! Flat binary arrays on disk
//!
//! Arrays are dumped verbatim in native layout: no header, no checksum.
//! Reading maps the file read-only and exposes it as a typed slice whose
//! byte length and alignment are checked once, when the mapping is created.

use bytemuck::Pod;
use linkrank_algorithms::AlgoError;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::marker::PhantomData;
use std::mem::size_of;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file does not exist
    #[error("File {0:?} is missing")]
    Missing(PathBuf),

    /// The file is shorter than the array it should hold
    #[error("File {path:?} holds {actual} bytes, expected at least {expected}")]
    Truncated {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The bytes cannot be reinterpreted as the element type
    #[error("File {path:?} cannot be viewed as [{type_name}]: {reason}")]
    Layout {
        path: PathBuf,
        type_name: &'static str,
        reason: String,
    },

    /// Metadata file has an unexpected size or values
    #[error("Invalid metadata in {path:?}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    /// The mapped arrays do not form a valid CSR matrix
    #[error("{path:?} does not hold a valid graph: {source}")]
    InvalidGraph {
        path: PathBuf,
        #[source]
        source: AlgoError,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Dump `data` to `path`, replacing any existing file
pub fn write_array<T: Pod>(path: &Path, data: &[T]) -> StorageResult<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytemuck::cast_slice(data))
        .map_err(io_error(path))?;
    writer.flush().map_err(io_error(path))?;
    writer.get_ref().sync_all().map_err(io_error(path))?;
    debug!("Wrote {} elements to {:?}", data.len(), path);
    Ok(())
}

/// Read-only, memory-mapped array of `len` elements of `T`.
///
/// Owns its mapping; dropping it unmaps exactly the bytes it mapped.
/// Empty arrays are not mapped at all.
#[derive(Debug)]
pub struct MappedArray<T> {
    map: Option<Mmap>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> MappedArray<T> {
    /// Map the first `len * size_of::<T>()` bytes of `path`.
    ///
    /// Fails if the file is missing or shorter than that.
    pub fn load(path: &Path, len: usize) -> StorageResult<Self> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::Missing(path.to_path_buf())
            } else {
                StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let type_name = std::any::type_name::<T>();
        let expected = len.checked_mul(size_of::<T>()).ok_or_else(|| StorageError::Layout {
            path: path.to_path_buf(),
            type_name,
            reason: format!("{} elements overflow the address space", len),
        })?;
        let actual = file.metadata().map_err(io_error(path))?.len();
        if actual < expected as u64 {
            return Err(StorageError::Truncated {
                path: path.to_path_buf(),
                expected: expected as u64,
                actual,
            });
        }
        if actual > expected as u64 {
            warn!(
                "{:?} holds {} bytes, only the first {} are used",
                path, actual, expected
            );
        }

        if expected == 0 {
            return Ok(Self {
                map: None,
                len: 0,
                _marker: PhantomData,
            });
        }

        // SAFETY: cache files are written once and never modified while mapped.
        let map = unsafe { MmapOptions::new().len(expected).map(&file) }.map_err(io_error(path))?;

        bytemuck::try_cast_slice::<u8, T>(&map).map_err(|e| StorageError::Layout {
            path: path.to_path_buf(),
            type_name,
            reason: format!("{:?}", e),
        })?;

        debug!("Mapped {} elements of {} from {:?}", len, type_name, path);
        Ok(Self {
            map: Some(map),
            len,
            _marker: PhantomData,
        })
    }

    pub fn as_slice(&self) -> &[T] {
        match &self.map {
            // Length and alignment were checked in `load`
            Some(map) => bytemuck::cast_slice(&map[..]),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Read a small file of native `i32` values into memory
pub fn read_i32_file(path: &Path) -> StorageResult<Vec<i32>> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::Missing(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if bytes.len() % size_of::<i32>() != 0 {
        return Err(StorageError::Layout {
            path: path.to_path_buf(),
            type_name: "i32",
            reason: format!("length {} is not a multiple of 4", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(size_of::<i32>())
        .map(bytemuck::pod_read_unaligned::<i32>)
        .collect())
}
