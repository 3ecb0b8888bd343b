//! Read-only random access over a compiled vector store.
//!
//! The store file is a bare `(words, dimensions)` f32 matrix (little-endian,
//! row-major, no header) produced by [`crate::compile`]. The shape is not
//! recorded in the file; whoever opens it supplies the same `words` and
//! `dimensions` the compiler used, and the open fails if the file length
//! disagrees.
//!
//! The file is immutable after publication, so any number of stores may be
//! open over it concurrently, across threads and processes, with no locking.

use crate::error::{ChargramError, Result};
use memmap2::Mmap;
use std::fs;
use std::io;
use std::path::Path;

/// Memory-mapped, read-only vector store.
///
/// Owns the mapping for its lifetime; dropping the store releases it. Row
/// views borrow from the mapping and are zero-copy (the on-disk layout is
/// little-endian, matching the hosts this store targets).
#[derive(Debug)]
pub struct VectorStore {
    mmap: Mmap,
    words: u64,
    dimensions: usize,
}

impl VectorStore {
    /// Open a compiled store with its out-of-band shape.
    ///
    /// Validates that the file is exactly `words * dimensions * 4` bytes
    /// before mapping; a mismatch means the shape is wrong or the file is
    /// not a compiled store.
    pub fn open(path: &Path, words: u64, dimensions: usize) -> Result<Self> {
        let expected = words
            .checked_mul(dimensions as u64)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                ChargramError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("store size overflow: {} words x {} dimensions", words, dimensions),
                ))
            })?;

        let file = fs::File::open(path)?;
        let actual = file.metadata()?.len();
        if actual != expected {
            return Err(ChargramError::SizeMismatch { expected, actual });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            words,
            dimensions,
        })
    }

    /// Hash space size (row count).
    pub fn words(&self) -> u64 {
        self.words
    }

    /// Embedding dimensionality (row length).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Zero-copy view of row `id` as `dimensions` floats.
    ///
    /// Ids at or past `words` are an [`ChargramError::OutOfRange`] error,
    /// not a panic. Row 0 is the reserved pad row and is always all zeros
    /// in a store produced by [`crate::compile`].
    pub fn row(&self, id: u64) -> Result<&[f32]> {
        if id >= self.words {
            return Err(ChargramError::OutOfRange {
                id,
                words: self.words,
            });
        }
        let row_bytes = self.dimensions * 4;
        let start = id as usize * row_bytes;
        let bytes = &self.mmap[start..start + row_bytes];
        // The mapping is page-aligned and rows are 4-byte multiples, so the
        // cast cannot fail in practice; surface it as data corruption rather
        // than panicking.
        bytemuck::try_cast_slice(bytes).map_err(|_| {
            ChargramError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "vector store row is not 4-byte aligned",
            ))
        })
    }
}
