use std::sync::Arc;
use std::time::Duration;

use rfp_core::config::LlmConfig;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider};
use crate::providers::create_provider;

/// Sampling settings for one model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Provider handle plus a per-call deadline. Built once, shared by `Arc`.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = create_provider(config)?;
        Ok(Self::new(provider, Duration::from_secs(config.timeout_secs)))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `prompt` through the provider.
    ///
    /// Exceeding the deadline yields [`LlmError::Timeout`]; a blank
    /// response yields [`LlmError::EmptyResponse`].
    pub async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        let call = self
            .provider
            .generate(prompt, params.temperature, params.max_tokens);
        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        debug!(chars = text.len(), "raw model response:\n{text}");
        Ok(text)
    }
}
