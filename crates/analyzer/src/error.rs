use rfp_core::error::ConfigError;
use rfp_ingest::document::ExtractionError;
use rfp_ingest::RetrievalError;
use rfp_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no document loaded")]
    NoDocument,
    #[error("failed to load document: {0}")]
    DocumentLoad(#[from] ExtractionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("model provider unavailable: {0}")]
    Provider(#[from] LlmError),
}
