//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] wires the splitter, the embedding and vector store
//! gateways, and the chat model into the full flow: ingest (split → embed →
//! store) and answer (retrieve → assemble context → generate).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragpipe::{InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chat_model(Arc::new(my_model))
//!     .build()?;
//!
//! pipeline.ingest(&document_text).await?;
//! let answer = pipeline.answer("What is this document about?").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::RecursiveSplitter;
use crate::config::RagConfig;
use crate::document::{Chunk, Record};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{AnswerGenerator, GenerationOptions};
use crate::llm::ChatModel;
use crate::memory::ConversationMemory;
use crate::retriever::{RetrievalOptions, Retriever};
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// One logical request per run: chunk → store → retrieve → generate,
/// executed sequentially. Gateway failures halt the pipeline call at the
/// first error and propagate unchanged; empty chunk sequences and empty
/// retrieval results are valid, non-error outcomes. Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    splitter: RecursiveSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("splitter", &self.splitter)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding gateway.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Return a reference to the vector store gateway.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Ingest a document: split → embed → store.
    ///
    /// Each stored record carries the chunk text plus `sequence_index` and
    /// `source_offset` metadata. Returns the chunks that were stored; an
    /// empty input is a valid no-op.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::EmbeddingUnavailable`] or
    /// [`RagError::StoreUnavailable`] unchanged from the failing gateway;
    /// nothing is retried and no partial result is returned.
    pub async fn ingest(&self, text: &str) -> Result<Vec<Chunk>> {
        let chunks: Vec<Chunk> = self.splitter.split(text).collect();
        if chunks.is_empty() {
            info!(chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .inspect_err(|e| error!(error = %e, "embedding failed during ingestion"))?;

        let records: Vec<Record> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, vector)| Record {
                vector,
                text: chunk.text.clone(),
                metadata: HashMap::from([
                    ("sequence_index".to_string(), chunk.sequence_index.to_string()),
                    ("source_offset".to_string(), chunk.source_offset.to_string()),
                ]),
            })
            .collect();

        self.store
            .insert(records)
            .await
            .inspect_err(|e| error!(error = %e, "insert failed during ingestion"))?;

        info!(chunk_count = chunks.len(), "ingested document");
        Ok(chunks)
    }

    /// Answer a question using the configured retrieval and generation
    /// defaults.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let retrieval = RetrievalOptions {
            top_k: self.config.top_k,
            score_threshold: self.config.score_threshold,
            deadline: None,
        };
        let generation =
            GenerationOptions { temperature: self.config.temperature, deadline: None };
        self.answer_with(question, &retrieval, &generation).await
    }

    /// Answer a question with per-call retrieval and generation options.
    ///
    /// Retrieval results are assembled into a fresh conversation memory
    /// (highest-relevance context first), the question is appended as the
    /// user entry, and the model's raw response comes back. Memory does not
    /// persist across calls.
    pub async fn answer_with(
        &self,
        question: &str,
        retrieval: &RetrievalOptions,
        generation: &GenerationOptions,
    ) -> Result<String> {
        let results = self.retriever.retrieve(question, retrieval).await?;
        let mut memory = ConversationMemory::assemble(&results);
        let answer = self.generator.generate(&mut memory, question, generation).await?;

        info!(context_count = results.len(), "answer generated");
        Ok(answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The configuration, embedding provider, vector store, and chat model are
/// required; the splitter defaults to a [`RecursiveSplitter`] built from
/// the configured chunk size and overlap.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    splitter: Option<RecursiveSplitter>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    model: Option<Arc<dyn ChatModel>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the text splitter (for custom boundary hints).
    pub fn splitter(mut self, splitter: RecursiveSplitter) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Set the embedding gateway.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Set the vector store gateway.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the chat model gateway.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Build the [`RagPipeline`], validating that all required parts are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if a required part is missing or
    /// the configured chunk parameters are inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self
            .config
            .ok_or_else(|| RagError::InvalidConfig("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::InvalidConfig("embedding_provider is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::InvalidConfig("vector_store is required".to_string()))?;
        let model = self
            .model
            .ok_or_else(|| RagError::InvalidConfig("chat_model is required".to_string()))?;

        let splitter = match self.splitter {
            Some(splitter) => splitter,
            None => RecursiveSplitter::new(config.chunk_size, config.chunk_overlap)?,
        };

        Ok(RagPipeline {
            config,
            splitter,
            retriever: Retriever::new(Arc::clone(&embedder), Arc::clone(&store)),
            generator: AnswerGenerator::new(model),
            embedder,
            store,
        })
    }
}
