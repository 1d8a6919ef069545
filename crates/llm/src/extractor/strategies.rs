use async_trait::async_trait;
use futures::future::join_all;
use rfp_core::analysis::{
    AnalysisFailure, AnalysisResult, Category, CategoryOutcome, FailureKind,
};
use tracing::{debug, warn};

use super::parse::{parse_bullets, parse_sectioned};
use super::prompts::{category_prompt, combined_prompt};
use super::ExtractionStrategy;
use crate::client::{GenerationParams, ModelClient};

/// Single call; the response carries all four categories under headers.
///
/// Any model-layer error, or a response without eligibility items, fails
/// every category.
#[derive(Debug, Clone, Copy)]
pub struct CombinedPrompt {
    pub params: GenerationParams,
}

impl Default for CombinedPrompt {
    fn default() -> Self {
        Self {
            params: GenerationParams::new(0.3, 2048),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for CombinedPrompt {
    fn name(&self) -> &'static str {
        "combined"
    }

    async fn extract(&self, client: &ModelClient, document_text: &str) -> AnalysisResult {
        let response = match client.generate(&combined_prompt(document_text), self.params).await {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = ?e.failure_kind(), error = %e, "combined analysis failed");
                return AnalysisResult::failed(e.to_failure());
            }
        };

        let mut parsed = parse_sectioned(&response);
        for (category, items) in &parsed {
            debug!(category = %category, items = ?items, "parsed section");
        }

        if parsed
            .get(&Category::Eligibility)
            .map_or(true, Vec::is_empty)
        {
            warn!("combined response has no eligibility items");
            return AnalysisResult::failed(AnalysisFailure::new(
                FailureKind::MissingEligibility,
                "no eligibility criteria found",
            ));
        }

        AnalysisResult::from_fn(|category| {
            CategoryOutcome::from_items(parsed.remove(&category).unwrap_or_default())
        })
    }
}

/// One concurrent call per category. A failing call only affects its own
/// category.
#[derive(Debug, Clone, Copy)]
pub struct PerCategoryPrompts {
    pub params: GenerationParams,
}

impl Default for PerCategoryPrompts {
    fn default() -> Self {
        Self {
            params: GenerationParams::new(0.3, 1024),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for PerCategoryPrompts {
    fn name(&self) -> &'static str {
        "per_category"
    }

    async fn extract(&self, client: &ModelClient, document_text: &str) -> AnalysisResult {
        let params = self.params;
        let calls = Category::ALL.map(|category| async move {
            let prompt = category_prompt(document_text, category);
            (category, client.generate(&prompt, params).await)
        });

        let mut result = AnalysisResult::from_fn(|_| CategoryOutcome::NoItems);
        for (category, response) in join_all(calls).await {
            let outcome = match response {
                Ok(response) => {
                    let items = parse_bullets(&response);
                    debug!(category = %category, items = ?items, "parsed category");
                    if category == Category::Eligibility && items.is_empty() {
                        warn!("eligibility response has no items");
                        CategoryOutcome::Failed(AnalysisFailure::new(
                            FailureKind::MissingEligibility,
                            "no eligibility criteria found",
                        ))
                    } else {
                        CategoryOutcome::from_items(items)
                    }
                }
                Err(e) => {
                    warn!(category = %category, kind = ?e.failure_kind(), error = %e, "category analysis failed");
                    CategoryOutcome::Failed(e.to_failure())
                }
            };
            result.set(category, outcome);
        }
        result
    }
}
