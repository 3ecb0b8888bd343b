//! Character-trigram hashing: deterministic string → row id.
//!
//! A token is wrapped with a sentinel character at both ends, every
//! overlapping 3-character window is hashed with FNV-1a over the code
//! points, and the per-window hashes are folded order-dependently before
//! reduction modulo the hash space size. The same token always yields the
//! same id; distinct tokens may collide (last writer wins in the compiled
//! store, see [`crate::compile`]).
//!
//! All constants below are part of the on-disk contract: changing any of
//! them invalidates previously compiled stores.

/// Reserved pad/unknown row. Always all-zero in a compiled store.
pub const PAD_ID: u64 = 0;

/// Designated pad token. Maps to [`PAD_ID`], as does the empty string.
pub const PAD_TOKEN: &str = "<pad>";

/// Sentinel wrapped around each token so 1- and 2-character tokens still
/// produce at least one trigram.
const BOUNDARY: char = '\u{1}';

/// FNV-1a offset basis / prime (64-bit).
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Order-dependent fold multiplier for combining per-trigram hashes.
const FOLD_MULTIPLIER: u64 = 31;

/// FNV-1a over the three code points of one trigram window.
#[inline]
fn trigram_hash(window: [char; 3]) -> u64 {
    let mut h = FNV_OFFSET;
    for c in window {
        h ^= c as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Map a token to a row id in `[0, vocab_size)`.
///
/// Pure and deterministic across runs, processes, and platforms: no
/// process-seeded hashing is involved. The empty string and [`PAD_TOKEN`]
/// map to [`PAD_ID`]; every other token (any Unicode content) is hashed
/// codepoint-wise without rejection.
///
/// Returns [`PAD_ID`] for `vocab_size == 0` (there is no valid row space).
pub fn token_to_id(token: &str, vocab_size: u64) -> u64 {
    if vocab_size == 0 || token.is_empty() || token == PAD_TOKEN {
        return PAD_ID;
    }

    let mut acc: u64 = 0;
    let mut window = [BOUNDARY, BOUNDARY, BOUNDARY];
    let mut filled = 0usize;
    for c in token.chars().chain(std::iter::once(BOUNDARY)) {
        window = [window[1], window[2], c];
        filled += 1;
        // First full window appears once two wrapped chars are in place:
        // the leading sentinel plus the first token char already occupy
        // window[0..2] on the first iteration.
        if filled >= 2 {
            acc = acc
                .wrapping_mul(FOLD_MULTIPLIER)
                .wrapping_add(trigram_hash(window));
        }
    }
    acc % vocab_size
}
