//! Query-side access to an [`EmbeddingIndex`].
//!
//! The retriever owns an `Arc` snapshot of the current index. Rebuilding
//! embeds outside any lock and swaps the finished snapshot in, so readers
//! holding the previous snapshot are never blocked.

use std::sync::{Arc, OnceLock, RwLock};

use rfp_core::config::ChunkingConfig;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chunker::{chunk_text, Chunk};
use crate::embedding::{Embedder, EmbeddingCache, EmbeddingError};
use crate::index::{cosine_similarity, squared_l2, EmbeddingIndex, RetrievalError};

const QUERY_CACHE_CAPACITY: usize = 256;

/// A chunk returned by a query, with both scores for the query vector.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    /// Squared L2 distance to the query.
    pub distance: f32,
    /// Cosine similarity to the query.
    pub similarity: f32,
}

pub struct SimilarityRetriever {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    current: RwLock<Option<Arc<EmbeddingIndex>>>,
    rebuild: Mutex<()>,
    dimensions: OnceLock<usize>,
    query_cache: EmbeddingCache,
}

impl SimilarityRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
            current: RwLock::new(None),
            rebuild: Mutex::new(()),
            dimensions: OnceLock::new(),
            query_cache: EmbeddingCache::new(QUERY_CACHE_CAPACITY),
        }
    }

    /// Replace the index with one built from `chunks`.
    ///
    /// Returns the number of indexed chunks. Concurrent calls run one at a
    /// time; on error the previous snapshot stays in place.
    pub async fn index(&self, chunks: Vec<Chunk>) -> Result<usize, RetrievalError> {
        let _guard = self.rebuild.lock().await;

        let index = EmbeddingIndex::build(chunks, self.embedder.as_ref(), self.batch_size).await?;
        if !index.is_empty() {
            self.pin_dimensions(index.dimensions())?;
        }

        let count = index.len();
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(index));
        info!(chunks = count, "document indexed");
        Ok(count)
    }

    /// Chunk `text` and index the result.
    pub async fn index_text(
        &self,
        text: &str,
        chunking: &ChunkingConfig,
    ) -> Result<usize, RetrievalError> {
        let chunks = chunk_text(text, chunking)?;
        self.index(chunks).await
    }

    /// The current index snapshot, if anything has been indexed.
    pub fn snapshot(&self) -> Option<Arc<EmbeddingIndex>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_indexed(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Number of chunks in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` chunks nearest to `text`, nearest first.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let index = self.ready_snapshot()?;
        let query = self.embed_query(text).await?;

        let hits = index.search(&query, k)?;
        debug!(k, hits = hits.len(), "similarity query");
        Ok(hits
            .into_iter()
            .map(|(pos, distance)| self.retrieved(&index, &query, pos, distance))
            .collect())
    }

    /// Every chunk with cosine similarity to `text` of at least `threshold`,
    /// most similar first.
    pub async fn most_similar(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let index = self.ready_snapshot()?;
        let query = self.embed_query(text).await?;

        let hits = index.above_threshold(&query, threshold)?;
        debug!(threshold, hits = hits.len(), "threshold query");
        Ok(hits
            .into_iter()
            .map(|(pos, similarity)| {
                let stored = index.vector(pos).unwrap_or_default();
                RetrievedChunk {
                    chunk: index.chunks()[pos].clone(),
                    distance: squared_l2(&query, stored),
                    similarity,
                }
            })
            .collect())
    }

    fn ready_snapshot(&self) -> Result<Arc<EmbeddingIndex>, RetrievalError> {
        let index = self.snapshot().ok_or(RetrievalError::NotIndexed)?;
        if index.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        Ok(index)
    }

    fn retrieved(
        &self,
        index: &EmbeddingIndex,
        query: &[f32],
        pos: usize,
        distance: f32,
    ) -> RetrievedChunk {
        let stored = index.vector(pos).unwrap_or_default();
        RetrievedChunk {
            chunk: index.chunks()[pos].clone(),
            distance,
            similarity: cosine_similarity(query, stored),
        }
    }

    async fn embed_query(&self, text: &str) -> Result<Arc<[f32]>, RetrievalError> {
        if let Some(cached) = self.query_cache.get(text) {
            return Ok(cached);
        }

        let mut vectors = self.embedder.embed_batch(&[text]).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: vectors.len(),
            }
            .into());
        }
        let vector: Arc<[f32]> = Arc::from(vectors.swap_remove(0));
        self.pin_dimensions(vector.len())?;
        self.query_cache.put(text, vector.clone());
        debug!(
            cached = self.query_cache.len(),
            hits = self.query_cache.hits(),
            misses = self.query_cache.misses(),
            "query embedding cached"
        );
        Ok(vector)
    }

    fn pin_dimensions(&self, actual: usize) -> Result<(), RetrievalError> {
        let expected = *self.dimensions.get_or_init(|| actual);
        if expected != actual {
            return Err(RetrievalError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}
