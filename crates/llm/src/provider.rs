use std::time::Duration;

use async_trait::async_trait;
use rfp_core::analysis::{AnalysisFailure, FailureKind};
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by OpenAI-style chat APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A generative model backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's response text.
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    /// Single-prompt convenience over [`LlmProvider::complete`].
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.complete(vec![Message::user(prompt)], temperature, max_tokens)
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("empty response from model")]
    EmptyResponse,
}

impl LlmError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            LlmError::Http(_) | LlmError::Api { .. } => FailureKind::Transport,
            LlmError::Parse(_) => FailureKind::MalformedResponse,
            LlmError::NotConfigured(_) => FailureKind::NotConfigured,
            LlmError::Timeout(_) => FailureKind::Timeout,
            LlmError::EmptyResponse => FailureKind::EmptyResponse,
        }
    }

    pub fn to_failure(&self) -> AnalysisFailure {
        AnalysisFailure::new(self.failure_kind(), self.to_string())
    }
}
