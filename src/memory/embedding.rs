//! Embedding providers: Ollama and a deterministic offline fallback.

use crate::error::EmbedError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Timeout for embedding calls. A timed-out call surfaces as
/// `EmbedError::Unavailable`, never hangs.
const EMBED_TIMEOUT: Duration = Duration::from_secs(10);

/// Turns text into a fixed-length vector. Every implementation must return
/// vectors of exactly `dimension()` components.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// The fixed output dimension of this provider.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Embedding via an Ollama model (`POST {base}/api/embeddings`).
pub struct OllamaEmbedder {
    http: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(EMBED_TIMEOUT)
            .json(&OllamaEmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbedError::Unavailable(format!(
                "embedding request returned {}",
                response.status()
            )));
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::InvalidResponse(e.to_string()))?;

        if body.embedding.len() != self.dimension {
            return Err(EmbedError::InvalidResponse(format!(
                "expected {} components, got {}",
                self.dimension,
                body.embedding.len()
            )));
        }

        Ok(body.embedding)
    }
}

/// Deterministic pseudo-random embedder keyed off a SHA-256 hash of the text.
///
/// The output is NOT semantically meaningful: identical texts map to
/// identical vectors, but similar texts do not map to nearby vectors. Use it
/// for tests and offline deployments where an embedding model is not
/// available and vector search degrades to exact-text recall.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn expand(&self, text: &str) -> Vec<f32> {
        let seed = Sha256::digest(text.as_bytes());
        let mut components = Vec::with_capacity(self.dimension);
        let mut counter: u64 = 0;

        // Counter-mode expansion of the seed into as many floats as needed.
        while components.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(counter.to_le_bytes());
            let block = hasher.finalize();
            for chunk in block.chunks_exact(4) {
                if components.len() == self.dimension {
                    break;
                }
                let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                // Map to [-1, 1].
                components.push((word as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32);
            }
            counter += 1;
        }

        // L2-normalize so cosine and dot metrics behave identically.
        let norm = components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > 0.0 {
            for c in &mut components {
                *c /= norm;
            }
        }

        components
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.expand(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("remember the milk").await.unwrap();
        let b = embedder.embed("remember the milk").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_embedder_distinguishes_texts() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("remember the milk").await.unwrap();
        let b = embedder.embed("remember the eggs").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn hash_embedder_output_matches_declared_dimension() {
        for dimension in [1, 7, 64, 768] {
            let embedder = HashEmbedder::new(dimension);
            let vector = embedder.embed("dimension check").await.unwrap();
            assert_eq!(vector.len(), dimension);
        }
    }

    #[tokio::test]
    async fn hash_embedder_output_is_unit_length() {
        let embedder = HashEmbedder::new(64);
        let vector = embedder.embed("norm check").await.unwrap();
        let norm = vector.iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
