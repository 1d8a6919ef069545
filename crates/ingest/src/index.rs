//! Flat exact nearest-neighbour index over chunk embeddings.

use std::cmp::Ordering;

use rayon::prelude::*;
use rfp_core::error::ConfigError;
use thiserror::Error;
use tracing::debug;

use crate::chunker::Chunk;
use crate::embedding::{Embedder, EmbeddingError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("no document has been indexed")]
    NotIndexed,
    #[error("the index contains no chunks")]
    EmptyIndex,
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Chunks plus one vector per chunk, all of the same dimension.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl EmbeddingIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble an index from precomputed vectors.
    pub fn from_parts(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self, RetrievalError> {
        if chunks.len() != vectors.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                actual: vectors.len(),
            }
            .into());
        }
        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(RetrievalError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }
        Ok(Self {
            chunks,
            vectors,
            dimensions,
        })
    }

    /// Embed `chunks` in batches of `batch_size` and build a new index.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, RetrievalError> {
        let batch_size = batch_size.max(1);
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embedded = embedder.embed_batch(&texts).await?;
            if embedded.len() != texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: texts.len(),
                    actual: embedded.len(),
                }
                .into());
            }
            vectors.extend(embedded);
        }

        let index = Self::from_parts(chunks, vectors)?;
        debug!(
            chunks = index.len(),
            dimensions = index.dimensions,
            "built embedding index"
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Vector dimension, or 0 for an empty index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.vectors.get(position).map(Vec::as_slice)
    }

    /// The `k` nearest chunks by squared L2 distance, nearest first.
    ///
    /// Returns `(position, distance)` pairs. `k` is clamped to `[1, len]`;
    /// ties keep chunk order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, RetrievalError> {
        if self.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        self.check_dimensions(query)?;

        let k = k.clamp(1, self.len());
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .par_iter()
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }

    /// Every chunk whose cosine similarity to `query` is at least
    /// `threshold`, most similar first.
    pub fn above_threshold(
        &self,
        query: &[f32],
        threshold: f32,
    ) -> Result<Vec<(usize, f32)>, RetrievalError> {
        if self.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        self.check_dimensions(query)?;

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .par_iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .filter(|(_, sim)| *sim >= threshold)
            .collect();
        scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        Ok(scored)
    }

    fn check_dimensions(&self, query: &[f32]) -> Result<(), RetrievalError> {
        if query.len() != self.dimensions {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
