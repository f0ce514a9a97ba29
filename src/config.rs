//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Pipeline-level configuration.
///
/// These are the defaults applied by [`RagPipeline`](crate::RagPipeline);
/// retrieval and generation parameters can also be overridden per call via
/// [`RetrievalOptions`](crate::RetrievalOptions) and
/// [`GenerationOptions`](crate::GenerationOptions).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size, in units of the splitter's innermost boundary
    /// (characters for the default boundary hints).
    pub chunk_size: usize,
    /// Overlap repeated between consecutive chunks, same unit as
    /// `chunk_size`. Must be strictly smaller than `chunk_size`.
    pub chunk_overlap: usize,
    /// Number of top results to request from retrieval.
    pub top_k: usize,
    /// Minimum similarity score for retrieval results, in `[0, 1]`.
    pub score_threshold: f32,
    /// Sampling temperature for answer generation, in `[0, 1]`.
    pub temperature: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 512, chunk_overlap: 100, top_k: 5, score_threshold: 0.80, temperature: 0.8 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to request from retrieval.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for retrieval results.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.config.score_threshold = threshold;
        self
    }

    /// Set the sampling temperature for answer generation.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `score_threshold` or `temperature` is outside `[0, 1]`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.chunk_size == 0 {
            return Err(RagError::InvalidConfig("chunk_size must be greater than zero".into()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        if config.top_k == 0 {
            return Err(RagError::InvalidConfig("top_k must be greater than zero".into()));
        }
        if !(0.0..=1.0).contains(&config.score_threshold) {
            return Err(RagError::InvalidConfig(format!(
                "score_threshold ({}) must be within [0, 1]",
                config.score_threshold
            )));
        }
        if !(0.0..=1.0).contains(&config.temperature) {
            return Err(RagError::InvalidConfig(format!(
                "temperature ({}) must be within [0, 1]",
                config.temperature
            )));
        }
        Ok(config)
    }
}
