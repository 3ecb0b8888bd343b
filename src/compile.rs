//! Streaming compiler: textual vector file → flat binary store.
//!
//! ## Source format (text)
//!
//! ```text
//! First line:       "<words> <dimensions>"   (two integers)
//! Each later line:  "<token> <f1> ... <fD>"  (whitespace-separated floats)
//! ```
//!
//! `words` is the hash space size, not the input vocabulary count: every
//! token is placed at `token_to_id(token, words)`, so colliding tokens
//! silently overwrite each other (last write wins, a deliberate trade of
//! compactness over completeness).
//!
//! ## Destination format (binary)
//!
//! A flat row-major sequence of `words * dimensions` little-endian f32
//! values, exactly `words * dimensions * 4` bytes, no header or footer.
//! Row 0 is forced to all zeros (reserved pad row). The shape travels
//! out-of-band; see [`crate::store::VectorStore::open`].
//!
//! Writes go to a private `<dest>.tmp` file that is renamed onto `dest`
//! only after a successful flush, so a concurrent reader never observes a
//! half-written store. A failed or aborted compile leaves at most an
//! orphaned temp file, never a partial `dest`.

use crate::error::{ChargramError, Result};
use crate::hash::token_to_id;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Outcome counters from a successful compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    /// Hash space size from the source header (row count of the store).
    pub words: u64,
    /// Embedding dimensionality from the source header.
    pub dimensions: usize,
    /// Lines whose vector was written to a row.
    pub rows_written: u64,
    /// Lines skipped (short token, wrong field count, unparsable float).
    pub lines_skipped: u64,
}

/// Compile a textual vector file into a flat binary store at `dest`.
///
/// Structural problems (unreadable source, malformed header, unwritable
/// destination) abort the compile and leave nothing at `dest`. Per-line
/// data problems are skipped and counted, never fatal. The pass is
/// strictly sequential in line order so collision overwrites are
/// reproducible: compiling the same source twice produces byte-identical
/// output.
///
/// Callers wanting idempotency should check for a valid `dest` before
/// invoking; `compile` always rebuilds.
pub fn compile(source: &Path, dest: &Path) -> Result<CompileStats> {
    let _span = tracing::info_span!("compile_vector_store", ?source, ?dest).entered();

    let file = fs::File::open(source)?;
    let mut reader = BufReader::new(file);

    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;
    let (words, dimensions) = parse_header(&first_line)?;

    let tmp_path = temp_path(dest);
    let result = stream_rows(&mut reader, words, dimensions, &tmp_path)
        .and_then(|stats| {
            fs::rename(&tmp_path, dest)?;
            Ok(stats)
        });

    match result {
        Ok(stats) => {
            tracing::info!(
                words = stats.words,
                dimensions = stats.dimensions,
                rows = stats.rows_written,
                skipped = stats.lines_skipped,
                "vector store compiled"
            );
            Ok(stats)
        }
        Err(e) => {
            // Orphaned temp files must be discardable without affecting dest.
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

/// Private write path: `<dest>.tmp` in the same directory, so the final
/// rename is atomic on the same filesystem.
fn temp_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Parse `"<words> <dimensions>"`. Both must be positive integers; a zero
/// hash space cannot reserve the pad row.
fn parse_header(line: &str) -> Result<(u64, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(ChargramError::MalformedHeader(format!(
            "expected two integers, found {} fields in {:?}",
            fields.len(),
            line.trim_end()
        )));
    }
    let words: u64 = fields[0].parse().map_err(|_| {
        ChargramError::MalformedHeader(format!("bad word count {:?}", fields[0]))
    })?;
    let dimensions: usize = fields[1].parse().map_err(|_| {
        ChargramError::MalformedHeader(format!("bad dimension count {:?}", fields[1]))
    })?;
    if words == 0 || dimensions == 0 {
        return Err(ChargramError::MalformedHeader(format!(
            "words and dimensions must be positive (got {} x {})",
            words, dimensions
        )));
    }
    Ok((words, dimensions))
}

/// Preallocate the temp file as a `(words, dimensions)` f32 matrix and
/// stream every data line into it.
fn stream_rows(
    reader: &mut impl BufRead,
    words: u64,
    dimensions: usize,
    tmp_path: &Path,
) -> Result<CompileStats> {
    let row_bytes = dimensions
        .checked_mul(4)
        .ok_or_else(|| ChargramError::MalformedHeader("row size overflow".to_string()))?;
    let byte_len = words.checked_mul(row_bytes as u64).ok_or_else(|| {
        ChargramError::MalformedHeader(format!(
            "store size overflow: {} words x {} dimensions",
            words, dimensions
        ))
    })?;

    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp_path)?;
    file.set_len(byte_len)?;
    let mut mmap = unsafe { memmap2::MmapMut::map_mut(&file)? };

    let mut rows_written: u64 = 0;
    let mut lines_skipped: u64 = 0;
    let mut values: Vec<f32> = Vec::with_capacity(dimensions);
    let mut row_buf = vec![0u8; row_bytes];

    for line in reader.lines() {
        let line = line?;
        match parse_row(&line, dimensions, &mut values) {
            Some(token) => {
                let id = token_to_id(token, words);
                for (chunk, v) in row_buf.chunks_exact_mut(4).zip(values.iter()) {
                    chunk.copy_from_slice(&v.to_le_bytes());
                }
                let offset = id as usize * row_bytes;
                mmap[offset..offset + row_bytes].copy_from_slice(&row_buf);
                rows_written += 1;
            }
            None => {
                if !line.trim().is_empty() {
                    tracing::debug!(line = %truncate_for_log(&line), "skipped malformed vector line");
                }
                lines_skipped += 1;
            }
        }
    }

    // Pad row invariant beats hash fidelity: row 0 is zero even if a token
    // hashed there.
    mmap[0..row_bytes].fill(0);

    mmap.flush()?;
    drop(mmap);
    file.sync_all()?;

    Ok(CompileStats {
        words,
        dimensions,
        rows_written,
        lines_skipped,
    })
}

/// Split a data line and parse its floats into `values`.
///
/// Returns the token on success. `None` means skip: wrong field count,
/// token shorter than 3 characters (too noisy to hash reliably), or any
/// float failing to parse. `values` holds all `dimensions` floats or is
/// not used by the caller, so a late parse failure never partially
/// applies a row.
fn parse_row<'a>(line: &'a str, dimensions: usize, values: &mut Vec<f32>) -> Option<&'a str> {
    let mut fields = line.split_whitespace();
    let token = fields.next()?;
    if token.chars().count() < 3 {
        return None;
    }

    values.clear();
    for field in fields {
        if values.len() == dimensions {
            return None; // more than dimensions floats
        }
        values.push(field.parse().ok()?);
    }
    if values.len() != dimensions {
        return None;
    }
    Some(token)
}

fn truncate_for_log(line: &str) -> &str {
    let end = line
        .char_indices()
        .nth(64)
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_two_integers() {
        assert_eq!(parse_header("2519370 300\n").unwrap(), (2519370, 300));
        assert_eq!(parse_header("  3   2  ").unwrap(), (3, 2));
    }

    #[test]
    fn header_rejects_wrong_field_count() {
        assert!(matches!(
            parse_header("300\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_header("1 2 3\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_header("\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_rejects_non_integers() {
        assert!(matches!(
            parse_header("three hundred\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_header("3.0 2\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_rejects_zero_shape() {
        assert!(matches!(
            parse_header("0 300\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_header("10 0\n"),
            Err(ChargramError::MalformedHeader(_))
        ));
    }

    #[test]
    fn row_parses_exact_shape() {
        let mut values = Vec::new();
        let token = parse_row("hello 1.0 -2.5", 2, &mut values);
        assert_eq!(token, Some("hello"));
        assert_eq!(values, vec![1.0, -2.5]);
    }

    #[test]
    fn row_skips_short_token() {
        let mut values = Vec::new();
        assert_eq!(parse_row("ab 1.0 2.0", 2, &mut values), None);
        // 3 chars is the threshold, even for multibyte characters.
        assert_eq!(parse_row("東京t 1.0 2.0", 2, &mut values), Some("東京t"));
    }

    #[test]
    fn row_skips_wrong_field_count() {
        let mut values = Vec::new();
        assert_eq!(parse_row("hello 1.0", 2, &mut values), None);
        assert_eq!(parse_row("hello 1.0 2.0 3.0", 2, &mut values), None);
        assert_eq!(parse_row("", 2, &mut values), None);
    }

    #[test]
    fn row_skips_unparsable_float() {
        let mut values = Vec::new();
        assert_eq!(parse_row("hello 1.0 oops", 2, &mut values), None);
    }

    #[test]
    fn temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/data/en/vectors.bin"));
        assert_eq!(tmp, Path::new("/data/en/vectors.bin.tmp"));
    }
}
