//! Question answering over an uploaded document or a fixed persona.
//!
//! A [`Session`] ties the pieces together: the [`Ingestor`] turns an upload
//! into text, the [`Chunker`] cuts it into overlapping windows, the
//! [`Retriever`] embeds and indexes them, and each question is answered by
//! the [`CompletionClient`] from either retrieved context or the persona's
//! static knowledge.

pub mod chunker;
pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod prompt;
pub mod retriever;
pub mod session;
pub mod vector_db;

pub use chunker::{Chunker, TextChunk};
pub use config::AssistantConfig;
pub use conversation::{ConversationStore, ConversationTurn};
pub use embedding::{Embedder, HttpEmbedder};
pub use error::{CompletionError, ConfigError, EmbeddingError, IngestError};
pub use ingest::{Document, Extraction, Ingestor};
pub use llm::{CompletionClient, LLM};
pub use prompt::{Persona, PromptMode};
pub use retriever::Retriever;
pub use session::{ProcessOutcome, Session};
pub use vector_db::VectorDB;
