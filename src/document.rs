//! Data types for chunks, stored records, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A contiguous, size-bounded slice of source text.
///
/// Chunks are the unit of embedding and retrieval. Each chunk's `text` is an
/// exact substring of the source document starting at `source_offset`;
/// consecutive chunks may share an overlapping region. Immutable once
/// produced by the splitter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// 0-based position of this chunk in the split sequence.
    pub sequence_index: usize,
    /// Byte offset of `text` within the source document.
    pub source_offset: usize,
}

/// A record handed to the vector store gateway for persistence.
///
/// The store owns the record once inserted and assigns it an opaque id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// The embedding vector for `text`.
    pub vector: Vec<f32>,
    /// The raw chunk text.
    pub text: String,
    /// Key-value metadata stored alongside the vector.
    pub metadata: HashMap<String, String>,
}

/// A retrieved chunk text paired with its similarity score.
///
/// Produced transiently by the retriever per query, ordered by descending
/// score; not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    /// The raw text of the retrieved chunk.
    pub text: String,
    /// Similarity score in `[0, 1]`, higher is more relevant.
    pub score: f32,
}
