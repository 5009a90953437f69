use std::sync::Arc;

use tracing::{debug, info};

use crate::chunker::TextChunk;
use crate::embedding::Embedder;
use crate::error::EmbeddingError;
use crate::vector_db::VectorDB;

/// Owns the session's single vector collection and the embedder used to
/// fill and query it.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    vector_db: Option<VectorDB>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Retriever {
            embedder,
            vector_db: None,
        }
    }

    pub fn has_index(&self) -> bool {
        self.vector_db.is_some()
    }

    pub fn indexed_chunks(&self) -> usize {
        self.vector_db.as_ref().map_or(0, VectorDB::len)
    }

    /// Embeds `chunks` into a fresh collection that replaces the current one.
    /// On failure the current collection is left as it was.
    pub async fn build(&mut self, chunks: &[TextChunk]) -> Result<(), EmbeddingError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let dimensions = self.embedder.dimensions();
        let mut vector_db = VectorDB::new();
        for (text, vector) in texts.into_iter().zip(vectors) {
            if vector.len() != dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            vector_db.insert(text, vector)?;
        }
        info!(
            chunks = vector_db.len(),
            model = self.embedder.model_id(),
            "built in-memory index"
        );
        self.vector_db = Some(vector_db);
        Ok(())
    }

    /// The `top_k` chunk texts nearest to `query`; empty without an index.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>, EmbeddingError> {
        let Some(vector_db) = &self.vector_db else {
            return Ok(Vec::new());
        };
        let query_vector = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let results = vector_db.search_similar(&query_vector, top_k)?;
        debug!(
            hits = results.len(),
            best = results.first().map(|r| r.distance),
            "retrieved context"
        );
        Ok(results
            .into_iter()
            .map(|scored| scored.record.content.clone())
            .collect())
    }

    pub fn clear(&mut self) {
        self.vector_db = None;
    }
}
