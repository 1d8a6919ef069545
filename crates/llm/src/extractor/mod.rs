//! Turns a document into an [`AnalysisResult`] by prompting the model and
//! parsing its bulleted answers.

mod parse;
mod prompts;
mod strategies;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use rfp_core::analysis::AnalysisResult;
use rfp_core::config::StrategyKind;
use tracing::info;

use crate::client::ModelClient;

pub use parse::{parse_bullets, parse_sectioned};
pub use prompts::{category_prompt, combined_prompt};
pub use strategies::{CombinedPrompt, PerCategoryPrompts};

/// How the four categories are obtained from the model.
///
/// Implementations never fail: model-layer errors are logged and turned
/// into failed outcomes.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, client: &ModelClient, document_text: &str) -> AnalysisResult;
}

pub struct StructuredExtractor {
    client: ModelClient,
    strategy: Box<dyn ExtractionStrategy>,
}

impl StructuredExtractor {
    pub fn new(client: ModelClient, strategy: Box<dyn ExtractionStrategy>) -> Self {
        Self { client, strategy }
    }

    pub fn for_kind(client: ModelClient, kind: StrategyKind) -> Self {
        let strategy: Box<dyn ExtractionStrategy> = match kind {
            StrategyKind::Combined => Box::new(CombinedPrompt::default()),
            StrategyKind::PerCategory => Box::new(PerCategoryPrompts::default()),
        };
        Self::new(client, strategy)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub async fn extract(&self, document_text: &str) -> AnalysisResult {
        info!(strategy = self.strategy.name(), chars = document_text.len(), "extracting analysis");
        let result = self.strategy.extract(&self.client, document_text).await;
        if result.has_failures() {
            info!(strategy = self.strategy.name(), "analysis finished with failed categories");
        }
        result
    }
}
