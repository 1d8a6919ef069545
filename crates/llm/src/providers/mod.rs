pub mod gemini;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use rfp_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
            Ok(Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                config.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "ollama" => Ok(Arc::new(ollama::OllamaProvider::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.into(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".into(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".into(),
            openai_base_url: None,
            ollama_url: "http://localhost:11434".into(),
            ollama_model: "llama3.2".into(),
            timeout_secs: 60,
        }
    }

    #[test]
    fn missing_keys_are_not_configured() {
        for provider in ["gemini", "openai"] {
            assert!(matches!(
                create_provider(&config(provider)),
                Err(LlmError::NotConfigured(_))
            ));
        }
    }

    #[test]
    fn builds_configured_providers() {
        let mut cfg = config("gemini");
        cfg.gemini_api_key = Some("key".into());
        assert!(create_provider(&cfg).is_ok());
        assert!(create_provider(&config("ollama")).is_ok());
        assert!(matches!(
            create_provider(&config("claude")),
            Err(LlmError::NotConfigured(msg)) if msg.contains("claude")
        ));
    }
}
