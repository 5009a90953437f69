use async_trait::async_trait;
use ndarray::Array1;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;

/// Turns text into fixed-dimension vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Array1<f32>>, EmbeddingError>;
    fn model_id(&self) -> &str;
    fn dimensions(&self) -> usize;
}

/// Client for an OpenAI-compatible `/embeddings` endpoint serving a
/// sentence-embedding model (text-embeddings-inference, Ollama, etc.).
#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Array1<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let mut req = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            });
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, message });
        }

        let mut parsed: EmbeddingResponse = resp.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: parsed.data.len(),
            });
        }
        // Servers may answer out of order; `index` is authoritative when present.
        if parsed.data.iter().any(|d| d.index.is_some()) {
            let mut seen = vec![false; texts.len()];
            for d in &parsed.data {
                match d.index {
                    Some(i) if i < seen.len() && !seen[i] => seen[i] = true,
                    other => return Err(EmbeddingError::BadIndex(other)),
                }
            }
            parsed.data.sort_by_key(|d| d.index);
        }

        let vectors = parsed
            .data
            .into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    });
                }
                Ok(Array1::from(d.embedding))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = vectors.len(), model = %self.model, "embedded texts");
        Ok(vectors)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
