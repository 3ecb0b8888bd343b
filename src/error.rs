//! Error types for vector store compilation and reads.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChargramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file's first line is not `<words> <dimensions>`.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The store file's length does not match the out-of-band shape.
    #[error("store size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// A row lookup past the end of the hash space.
    #[error("row id {id} out of range (words={words})")]
    OutOfRange { id: u64, words: u64 },
}

pub type Result<T> = std::result::Result<T, ChargramError>;
