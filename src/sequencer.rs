//! Document → fixed-length id sequence transform.
//!
//! Tokenization is deliberately minimal: documents are split on Unicode
//! whitespace and each token is hashed with [`token_to_id`]. Rows are
//! truncated to `max_len` tokens and right-padded with [`PAD_ID`], so every
//! output row has exactly `max_len` entries regardless of input.

use crate::hash::{token_to_id, PAD_ID};

/// Stateless sequencer over a fixed hash space.
///
/// Calling [`transform`](Self::transform) twice on the same input yields
/// identical output: there are no internal counters and no vocabulary growth.
#[derive(Debug, Clone, Copy)]
pub struct CharTrigramSequencer {
    vocab_size: u64,
    max_len: usize,
}

impl CharTrigramSequencer {
    /// Create a sequencer producing ids in `[0, vocab_size)` and rows of
    /// exactly `max_len` ids.
    pub fn new(vocab_size: u64, max_len: usize) -> Self {
        Self {
            vocab_size,
            max_len,
        }
    }

    /// The hash space size ids are bounded by.
    pub fn vocab_size(&self) -> u64 {
        self.vocab_size
    }

    /// The fixed output row length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Transform documents into a `(documents.len(), max_len)` id matrix.
    ///
    /// Tokens beyond `max_len` are dropped; shorter documents are padded
    /// with [`PAD_ID`]. Never fails on malformed input.
    pub fn transform(&self, documents: &[&str]) -> Vec<Vec<u64>> {
        documents.iter().map(|doc| self.transform_one(doc)).collect()
    }

    /// Transform a single document into exactly `max_len` ids.
    pub fn transform_one(&self, document: &str) -> Vec<u64> {
        let mut row = Vec::with_capacity(self.max_len);
        for token in document.split_whitespace().take(self.max_len) {
            row.push(token_to_id(token, self.vocab_size));
        }
        row.resize(self.max_len, PAD_ID);
        row
    }
}
