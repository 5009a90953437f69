use ndarray::Array1;

use crate::error::EmbeddingError;

#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub content: String,
    pub embedding: Array1<f32>,
}

#[derive(Debug, Clone)]
pub struct ScoredRecord<'a> {
    pub record: &'a EmbeddingRecord,
    pub distance: f32,
}

/// In-memory collection of embedded chunks, searched by brute force.
#[derive(Debug, Default)]
pub struct VectorDB {
    records: Vec<EmbeddingRecord>,
}

impl VectorDB {
    pub fn new() -> Self {
        VectorDB {
            records: Vec::new(),
        }
    }

    pub fn insert(
        &mut self,
        content: String,
        embedding: Array1<f32>,
    ) -> Result<(), EmbeddingError> {
        if let Some(expected) = self.dimensions() {
            if expected != embedding.len() {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }
        self.records.push(EmbeddingRecord { content, embedding });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Vector length shared by every record, `None` while empty.
    pub fn dimensions(&self) -> Option<usize> {
        self.records.first().map(|r| r.embedding.len())
    }

    /// Up to `top_k` records closest to `query`, nearest first. Equal
    /// distances keep insertion order.
    pub fn search_similar(
        &self,
        query: &Array1<f32>,
        top_k: usize,
    ) -> Result<Vec<ScoredRecord<'_>>, EmbeddingError> {
        if let Some(expected) = self.dimensions() {
            if expected != query.len() {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<ScoredRecord<'_>> = self
            .records
            .iter()
            .map(|record| ScoredRecord {
                record,
                distance: squared_distance(&record.embedding, query),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn squared_distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let diff = a - b;
    diff.dot(&diff)
}
