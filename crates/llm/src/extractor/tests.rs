use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rfp_core::analysis::{
    Category, CategoryOutcome, FailureKind, ERROR_SENTINEL, NO_ITEMS_SENTINEL,
};
use rfp_core::config::StrategyKind;

use super::*;
use crate::provider::{LlmError, LlmProvider, Message};

/// Answers each prompt with the result of a closure over the prompt text.
struct ScriptedProvider<F> {
    respond: F,
    calls: AtomicUsize,
}

impl<F> ScriptedProvider<F>
where
    F: Fn(&str) -> Result<String, LlmError> + Send + Sync,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl<F> LlmProvider for ScriptedProvider<F>
where
    F: Fn(&str) -> Result<String, LlmError> + Send + Sync,
{
    async fn complete(&self, messages: Vec<Message>, _: f32, _: u32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        (self.respond)(prompt)
    }
}

struct Hanging;

#[async_trait]
impl LlmProvider for Hanging {
    async fn complete(&self, _: Vec<Message>, _: f32, _: u32) -> Result<String, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(String::new())
    }
}

fn client(provider: impl LlmProvider + 'static) -> ModelClient {
    ModelClient::new(Arc::new(provider), Duration::from_millis(200))
}

const COMBINED_RESPONSE: &str = "\
=== ELIGIBILITY REQUIREMENTS ===
- item1
- item2

=== COMPLIANCE REQUIREMENTS ===
- Comply with state procurement code

=== SUBMISSION REQUIREMENTS ===
- [list each requirement on a new line starting with -]

=== RISK FACTORS ===
- Liquidated damages of 5% per week
";

#[tokio::test]
async fn combined_response_is_parsed_and_rendered() {
    let extractor = StructuredExtractor::for_kind(
        client(ScriptedProvider::new(|_: &str| Ok(COMBINED_RESPONSE.to_string()))),
        StrategyKind::Combined,
    );
    let result = extractor.extract("RFP body").await;

    assert_eq!(result.render(Category::Eligibility), "\n• item1\n• item2");
    assert_eq!(
        result.render(Category::Compliance),
        "\n• Comply with state procurement code"
    );
    assert_eq!(result.render(Category::Submission), NO_ITEMS_SENTINEL);
    assert_eq!(
        result.render(Category::Risks),
        "\n• Liquidated damages of 5% per week"
    );
    assert!(!result.has_failures());
}

#[tokio::test]
async fn combined_makes_one_call_with_document_in_prompt() {
    let provider = Arc::new(ScriptedProvider::new(|prompt: &str| {
        assert!(prompt.contains("UNIQUE-RFP-MARKER"));
        assert!(prompt.contains("=== RISK FACTORS ==="));
        Ok(COMBINED_RESPONSE.to_string())
    }));
    let extractor = StructuredExtractor::new(
        ModelClient::new(provider.clone(), Duration::from_secs(1)),
        Box::new(CombinedPrompt::default()),
    );
    extractor.extract("UNIQUE-RFP-MARKER").await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn combined_empty_response_fails_every_category() {
    let extractor = StructuredExtractor::for_kind(
        client(ScriptedProvider::new(|_: &str| Ok("   ".to_string()))),
        StrategyKind::Combined,
    );
    let result = extractor.extract("RFP body").await;

    for (_, outcome) in result.iter() {
        assert_eq!(outcome.render(), ERROR_SENTINEL);
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::EmptyResponse);
    }
}

#[tokio::test]
async fn combined_without_eligibility_fails_every_category() {
    let extractor = StructuredExtractor::for_kind(
        client(ScriptedProvider::new(|_: &str| {
            Ok("=== RISK FACTORS ===\n- Unlimited liability".to_string())
        })),
        StrategyKind::Combined,
    );
    let result = extractor.extract("RFP body").await;

    assert_eq!(result.render(Category::Risks), ERROR_SENTINEL);
    assert_eq!(
        result.get(Category::Eligibility).failure().unwrap().kind,
        FailureKind::MissingEligibility
    );
}

#[tokio::test]
async fn combined_transport_error_and_timeout() {
    let failing = StructuredExtractor::for_kind(
        client(ScriptedProvider::new(|_: &str| {
            Err(LlmError::Api { status: 503, body: "unavailable".into() })
        })),
        StrategyKind::Combined,
    );
    let result = failing.extract("RFP body").await;
    assert_eq!(
        result.get(Category::Submission).failure().unwrap().kind,
        FailureKind::Transport
    );

    let hanging = StructuredExtractor::for_kind(client(Hanging), StrategyKind::Combined);
    let result = hanging.extract("RFP body").await;
    for (_, outcome) in result.iter() {
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Timeout);
    }
}

#[tokio::test]
async fn per_category_issues_four_calls_and_isolates_failures() {
    let provider = Arc::new(ScriptedProvider::new(|prompt: &str| {
        if prompt.contains(Category::Risks.question()) {
            Err(LlmError::Parse("bad json".into()))
        } else if prompt.contains(Category::Submission.question()) {
            Ok("Nothing specific is required.".to_string())
        } else {
            Ok("Summary:\n- first point\n• second point".to_string())
        }
    }));
    let extractor = StructuredExtractor::new(
        ModelClient::new(provider.clone(), Duration::from_secs(1)),
        Box::new(PerCategoryPrompts::default()),
    );
    let result = extractor.extract("RFP body").await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        result.render(Category::Eligibility),
        "\n• first point\n• second point"
    );
    assert_eq!(
        result.render(Category::Compliance),
        "\n• first point\n• second point"
    );
    assert_eq!(result.get(Category::Submission), &CategoryOutcome::NoItems);
    assert_eq!(result.render(Category::Risks), ERROR_SENTINEL);
    assert_eq!(
        result.get(Category::Risks).failure().unwrap().kind,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn per_category_empty_eligibility_degrades_only_eligibility() {
    let extractor = StructuredExtractor::for_kind(
        client(ScriptedProvider::new(|prompt: &str| {
            if prompt.contains(Category::Eligibility.question()) {
                Ok("No explicit criteria.".to_string())
            } else {
                Ok("- something".to_string())
            }
        })),
        StrategyKind::PerCategory,
    );
    let result = extractor.extract("RFP body").await;

    assert_eq!(result.render(Category::Eligibility), ERROR_SENTINEL);
    for category in [Category::Compliance, Category::Submission, Category::Risks] {
        assert_eq!(result.render(category), "\n• something");
    }
}

#[tokio::test]
async fn per_category_calls_run_concurrently() {
    struct Sleepy;

    #[async_trait]
    impl LlmProvider for Sleepy {
        async fn complete(&self, _: Vec<Message>, _: f32, _: u32) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_millis(120)).await;
            Ok("- done".into())
        }
    }

    // Sequential calls would need at least 480ms.
    let extractor = StructuredExtractor::for_kind(
        ModelClient::new(Arc::new(Sleepy), Duration::from_millis(400)),
        StrategyKind::PerCategory,
    );
    let started = tokio::time::Instant::now();
    let result = extractor.extract("RFP body").await;
    assert!(!result.has_failures());
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[test]
fn strategy_names() {
    let c = client(ScriptedProvider::new(|_: &str| Ok(String::new())));
    assert_eq!(
        StructuredExtractor::for_kind(c.clone(), StrategyKind::Combined).strategy_name(),
        "combined"
    );
    assert_eq!(
        StructuredExtractor::for_kind(c, StrategyKind::PerCategory).strategy_name(),
        "per_category"
    );
}
