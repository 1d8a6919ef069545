//! Document ingestion for RFP analysis: text extraction, chunking,
//! embedding, and in-memory similarity search.

pub mod chunker;
pub mod document;
pub mod embedding;
pub mod index;
pub mod retriever;

pub use chunker::{chunk, chunk_text, Chunk};
pub use document::{FileTextExtractor, TextExtractor};
pub use embedding::{Embedder, EmbeddingError};
pub use index::{EmbeddingIndex, RetrievalError};
pub use retriever::{RetrievedChunk, SimilarityRetriever};
