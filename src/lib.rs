//! Character-trigram hashing and memory-mapped vector stores.
//!
//! This crate compiles large text-format pretrained word-vector files
//! (fastText/GloVe style: a `"<words> <dimensions>"` header followed by
//! `"<token> <f1> ... <fD>"` lines) into fixed-layout flat binary matrices
//! that open by direct memory mapping, and provides the deterministic
//! trigram hashing used both to place rows at compile time and to find
//! them again at lookup time — no live vocabulary table needed.
//!
//! - [`hash::token_to_id`] — string → bounded row id, pure and stable
//! - [`CharTrigramSequencer`] — documents → fixed-length id sequences
//! - [`compile`] — streaming text → binary compiler with atomic publish
//! - [`VectorStore`] — read-only mmap'd random row access
//!
//! Row 0 is reserved as the pad/unknown row and is always all zeros.
//! Hash collisions are accepted: the last token written to a row wins.
//!
//! ```no_run
//! use chargram::{compile, VectorStore, CharTrigramSequencer};
//! use std::path::Path;
//!
//! let stats = compile(Path::new("wiki.en.vec"), Path::new("wiki.en.bin"))?;
//! let store = VectorStore::open(Path::new("wiki.en.bin"), stats.words, stats.dimensions)?;
//!
//! let seq = CharTrigramSequencer::new(stats.words, 1024);
//! for id in seq.transform_one("hello world") {
//!     let _vector = store.row(id)?;
//! }
//! # Ok::<(), chargram::ChargramError>(())
//! ```

pub mod compile;
pub mod error;
pub mod hash;
pub mod sequencer;
pub mod store;

pub use compile::{compile, CompileStats};
pub use error::{ChargramError, Result};
pub use hash::{token_to_id, PAD_ID, PAD_TOKEN};
pub use sequencer::CharTrigramSequencer;
pub use store::VectorStore;
