pub mod cache;
pub mod hashing;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use rfp_core::config::EmbeddingConfig;

pub use cache::EmbeddingCache;
pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the embedding backend named in config.
///
/// `ollama_url`, `openai_api_key` and `openai_base_url` come from the LLM
/// section, since both layers talk to the same servers.
pub fn create_embedder(
    config: &EmbeddingConfig,
    ollama_url: &str,
    openai_api_key: Option<&str>,
    openai_base_url: Option<&str>,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "hashing" => Ok(Arc::new(HashingEmbedder::new(config.dimensions))),
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            ollama_url.to_string(),
            config.model.clone(),
            config.dimensions,
        ))),
        "openai" => {
            let api_key = openai_api_key
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key.to_string(),
                config.model.clone(),
                openai_base_url.map(str::to_string),
                config.dimensions,
            )))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: '{other}'"
        ))),
    }
}
