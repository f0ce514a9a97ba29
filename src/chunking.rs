//! Recursive boundary-aware text splitting.
//!
//! [`RecursiveSplitter`] splits source text into overlapping [`Chunk`]s by
//! trying an ordered list of boundary hints (paragraph break, sentence
//! break, space, then single characters) and merging the resulting pieces
//! up to the configured chunk size. Every chunk is an exact substring of the source at
//! its `source_offset`, so callers can always map a chunk back to where it
//! came from.

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// Boundary hints tried in priority order by [`RecursiveSplitter::new`].
///
/// The empty string marks the character-level fallback for text with no
/// usable boundary.
pub const DEFAULT_BOUNDARY_HINTS: &[&str] = &["\n\n", ". ", "! ", "? ", " ", ""];

/// Splits text recursively along boundary hints into size-bounded chunks.
///
/// Sizes are measured in atomic units of the innermost boundary hint:
/// characters when the hint list ends with `""` (the default), whole words
/// when it ends at `" "`, and so on. `chunk_overlap` units from the tail of
/// each chunk are repeated at the start of the next chunk, at the
/// granularity of the pieces produced by the boundary split.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::RecursiveSplitter;
///
/// let splitter = RecursiveSplitter::new(512, 100)?;
/// for chunk in splitter.split(&document_text) {
///     println!("{}: {}", chunk.sequence_index, chunk.text);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    boundary_hints: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter with the given chunk size and overlap, using
    /// [`DEFAULT_BOUNDARY_HINTS`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`. Validation happens here so an invalid
    /// parameter pair can never reach [`split`](Self::split).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidConfig("chunk_size must be greater than zero".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            boundary_hints: DEFAULT_BOUNDARY_HINTS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Replace the boundary hints, tried in the given order.
    ///
    /// An empty-string hint means character-level splitting; an empty list
    /// behaves like `[""]`. The last hint determines the unit `chunk_size`
    /// is measured in.
    pub fn with_boundary_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boundary_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    /// Split `text` into a lazy, restartable sequence of chunks.
    ///
    /// The boundary decomposition happens in one pass up front; chunks are
    /// merged and yielded on demand. Empty input yields an empty sequence,
    /// and input that fits within one chunk yields exactly one chunk equal
    /// to the input. Call `split` again (or clone the iterator) to restart.
    pub fn split<'t>(&self, text: &'t str) -> Chunks<'t> {
        let atom = self.boundary_hints.last().cloned().unwrap_or_default();
        let mut pieces = Vec::new();
        if !text.is_empty() {
            decompose(text, 0, text.len(), 0, &self.boundary_hints, &atom, self.chunk_size, &mut pieces);
        }

        // Whitespace-only hints are trimmed from non-final chunk tails,
        // longest match first.
        let mut trim_hints: Vec<String> = self
            .boundary_hints
            .iter()
            .filter(|h| !h.is_empty() && h.chars().all(char::is_whitespace))
            .cloned()
            .collect();
        trim_hints.sort_by_key(|h| std::cmp::Reverse(h.len()));

        Chunks {
            text,
            pieces,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            trim_hints,
            next_piece: 0,
            sequence_index: 0,
        }
    }
}

/// A contiguous source span holding a whole number of atomic units.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    units: usize,
}

/// Count atomic units in `text`: characters when `atom` is empty, otherwise
/// occurrences of the atom-delimited tokens (at least one for non-empty text).
fn measure(text: &str, atom: &str) -> usize {
    if atom.is_empty() {
        text.chars().count()
    } else {
        text.split(atom).filter(|s| !s.is_empty()).count().max(1)
    }
}

/// Split a segment at `separator`, keeping the separator attached to the
/// preceding sub-segment so the sub-segments tile the original exactly.
fn split_attached(segment: &str, separator: &str) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut start = 0;
    while let Some(pos) = segment[start..].find(separator) {
        let end = start + pos + separator.len();
        bounds.push((start, end));
        start = end;
    }
    if start < segment.len() {
        bounds.push((start, segment.len()));
    }
    bounds
}

/// Emit one piece per character, for text with no remaining boundary.
fn char_pieces(text: &str, start: usize, end: usize, out: &mut Vec<Piece>) {
    for (idx, ch) in text[start..end].char_indices() {
        let s = start + idx;
        out.push(Piece { start: s, end: s + ch.len_utf8(), units: 1 });
    }
}

/// Recursively decompose `text[start..end]` into pieces that each fit the
/// chunk size, trying `hints[level..]` in order.
fn decompose(
    text: &str,
    start: usize,
    end: usize,
    level: usize,
    hints: &[String],
    atom: &str,
    chunk_size: usize,
    out: &mut Vec<Piece>,
) {
    let units = measure(&text[start..end], atom);
    if units <= chunk_size {
        out.push(Piece { start, end, units });
        return;
    }
    if level >= hints.len() || hints[level].is_empty() {
        char_pieces(text, start, end, out);
        return;
    }

    let bounds = split_attached(&text[start..end], &hints[level]);
    if bounds.len() <= 1 {
        // Separator absent here; try the next boundary.
        decompose(text, start, end, level + 1, hints, atom, chunk_size, out);
        return;
    }
    for (s, e) in bounds {
        decompose(text, start + s, start + e, level + 1, hints, atom, chunk_size, out);
    }
}

/// Lazy chunk sequence produced by [`RecursiveSplitter::split`].
///
/// Finite, ordered by source position; `sequence_index` is the 0-based
/// emission index. Cloning restarts the sequence.
#[derive(Debug, Clone)]
pub struct Chunks<'t> {
    text: &'t str,
    pieces: Vec<Piece>,
    chunk_size: usize,
    chunk_overlap: usize,
    trim_hints: Vec<String>,
    next_piece: usize,
    sequence_index: usize,
}

impl Chunks<'_> {
    /// Trim one trailing boundary separator from a non-final chunk span.
    fn trimmed_end(&self, start: usize, end: usize) -> usize {
        let chunk = &self.text[start..end];
        for hint in &self.trim_hints {
            if chunk.len() > hint.len() && chunk.ends_with(hint.as_str()) {
                return end - hint.len();
            }
        }
        end
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.next_piece >= self.pieces.len() {
            return None;
        }

        let first = self.next_piece;
        let mut units = 0;
        let mut i = first;
        while i < self.pieces.len() && units + self.pieces[i].units <= self.chunk_size {
            units += self.pieces[i].units;
            i += 1;
        }
        if i == first {
            // A single oversized piece still advances the cursor.
            i = first + 1;
        }

        let start = self.pieces[first].start;
        let mut end = self.pieces[i - 1].end;

        if i >= self.pieces.len() {
            self.next_piece = i;
        } else {
            // Carry trailing whole pieces within the overlap allowance into the
            // next chunk, always leaving at least one consumed piece so the
            // sequence advances.
            let mut carry = i;
            let mut carry_units = 0;
            while carry > first + 1
                && carry_units + self.pieces[carry - 1].units <= self.chunk_overlap
            {
                carry_units += self.pieces[carry - 1].units;
                carry -= 1;
            }
            self.next_piece = carry;
            end = self.trimmed_end(start, end);
        }

        let chunk = Chunk {
            text: self.text[start..end].to_string(),
            sequence_index: self.sequence_index,
            source_offset: start,
        };
        self.sequence_index += 1;
        Some(chunk)
    }
}
