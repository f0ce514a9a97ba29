//! # ragpipe
//!
//! A minimal Retrieval-Augmented Generation pipeline: split a document into
//! overlapping chunks, embed and persist them in a vector store, retrieve
//! the chunks relevant to a question by similarity, and feed the retrieved
//! context plus the question to a chat model to produce an answer.
//!
//! ## Overview
//!
//! The core flow is `ingest` (split → embed → store) and `answer`
//! (retrieve → assemble context → generate), wired together by
//! [`RagPipeline`]. External services sit behind three gateway traits:
//!
//! - [`EmbeddingProvider`] — text → fixed-dimension vector
//! - [`VectorStore`] — persist records, answer nearest-neighbor queries
//! - [`ChatModel`] — ordered messages + temperature → text
//!
//! [`InMemoryVectorStore`] ships for development and testing. Real
//! backends are feature-gated: `ollama` enables [`ollama::OllamaEmbedder`]
//! and [`ollama::OllamaChatModel`], `qdrant` enables
//! [`qdrant::QdrantVectorStore`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragpipe::{InMemoryVectorStore, RagConfig, RagPipeline};
//! use ragpipe::ollama::{OllamaChatModel, OllamaEmbedder};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::builder().chunk_size(1000).chunk_overlap(500).build()?)
//!     .embedding_provider(Arc::new(OllamaEmbedder::new()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chat_model(Arc::new(OllamaChatModel::deepseek()))
//!     .build()?;
//!
//! pipeline.ingest(&std::fs::read_to_string("doc.txt")?).await?;
//! let answer = pipeline.answer("What is this document about?").await?;
//! ```

pub mod chunking;
pub mod config;
mod deadline;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod llm;
pub mod memory;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{Chunks, RecursiveSplitter, DEFAULT_BOUNDARY_HINTS};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Record, RetrievalResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::{AnswerGenerator, GenerationOptions};
pub use inmemory::InMemoryVectorStore;
pub use llm::ChatModel;
pub use memory::{ConversationMemory, Message, Role};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaChatModel, OllamaEmbedder};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
#[cfg(feature = "qdrant")]
pub use qdrant::{QdrantConfig, QdrantVectorStore};
pub use retriever::{RetrievalOptions, Retriever};
pub use vectorstore::VectorStore;
