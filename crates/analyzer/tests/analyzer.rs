use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rfp_analyzer::{AnalyzerError, RfpAnalyzer};
use rfp_core::analysis::{Category, ERROR_SENTINEL};
use rfp_core::config::{ChunkingConfig, Config, EligibilityMode, StrategyKind};
use rfp_core::document::{CompanyProfile, SectionName};
use rfp_ingest::embedding::HashingEmbedder;
use rfp_ingest::{RetrievalError, SimilarityRetriever};
use rfp_llm::{LlmError, LlmProvider, Message, ModelClient};
use serde_json::json;

const RFP: &str = "\
City of Springfield Request for Proposals: Road Resurfacing

Eligibility Requirements
Bidders must hold a valid state contractor license, carry general liability
insurance of at least $2,000,000 and have completed three comparable projects.

Submission Requirements
Proposals must be submitted as a single PDF no later than 5pm on March 3rd,
with pricing in a separately sealed envelope and signed by an officer.

Terms and Conditions
Payment is net 45. Liquidated damages of $1,500 per day apply after the
completion date. The contractor shall indemnify the city without limit.
";

const COMBINED: &str = "\
=== ELIGIBILITY REQUIREMENTS ===
- Valid state contractor license
- $2,000,000 general liability insurance
=== COMPLIANCE REQUIREMENTS ===
- Signed by an officer
=== SUBMISSION REQUIREMENTS ===
- Single PDF by March 3rd, 5pm
=== RISK FACTORS ===
- Uncapped indemnity
";

enum Behavior {
    Reply(&'static str),
    Fail,
    Hang,
}

struct FakeProvider(Behavior);

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, _: Vec<Message>, _: f32, _: u32) -> Result<String, LlmError> {
        match self.0 {
            Behavior::Reply(text) => Ok(text.to_string()),
            Behavior::Fail => Err(LlmError::Api {
                status: 502,
                body: "bad gateway".into(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("YES".into())
            }
        }
    }
}

fn client(behavior: Behavior) -> ModelClient {
    ModelClient::new(Arc::new(FakeProvider(behavior)), Duration::from_millis(100))
}

fn analyzer(behavior: Behavior) -> RfpAnalyzer {
    RfpAnalyzer::builder(client(behavior)).build().unwrap()
}

fn profile() -> CompanyProfile {
    CompanyProfile::from_value(json!({
        "name": "Acme Paving",
        "licenses": ["state contractor"],
        "insurance": 5000000
    }))
    .unwrap()
}

#[tokio::test]
async fn load_splits_sections_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rfp.txt");
    std::fs::write(&path, RFP).unwrap();

    let analyzer = analyzer(Behavior::Reply(COMBINED));
    let document = analyzer.load(&path).unwrap();

    let eligibility = document.section(SectionName::Eligibility);
    assert!(eligibility.starts_with("Eligibility Requirements"));
    assert!(eligibility.ends_with("three comparable projects."));
    assert!(document
        .section(SectionName::Submission)
        .starts_with("Submission Requirements"));
    assert!(document
        .section(SectionName::Terms)
        .ends_with("without limit."));
}

#[tokio::test]
async fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyzer(Behavior::Reply(COMBINED))
        .load(&dir.path().join("nope.pdf"))
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::DocumentLoad(_)));
}

#[tokio::test]
async fn analyze_returns_categories_and_sections() {
    let analyzer = analyzer(Behavior::Reply(COMBINED));
    let document = analyzer.document_from_text(RFP);
    let report = analyzer.analyze(&document).await.unwrap();

    assert_eq!(
        report.analysis.render(Category::Eligibility),
        "\n• Valid state contractor license\n• $2,000,000 general liability insurance"
    );
    assert_eq!(report.analysis.render(Category::Risks), "\n• Uncapped indemnity");
    assert_eq!(report.sections.len(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["risk_analysis"], "\n• Uncapped indemnity");
    assert!(json["sections"]["terms"]
        .as_str()
        .unwrap()
        .starts_with("Terms and Conditions"));
}

#[tokio::test]
async fn analyze_is_idempotent_on_sections() {
    let analyzer = analyzer(Behavior::Reply(COMBINED));
    let document = analyzer.document_from_text(RFP);
    let first = analyzer.analyze(&document).await.unwrap();
    let second = analyzer.analyze(&document).await.unwrap();
    assert_eq!(first.sections, second.sections);
    assert_eq!(first.analysis, second.analysis);
}

#[tokio::test]
async fn analyze_degrades_on_model_failure() {
    let analyzer = analyzer(Behavior::Fail);
    let document = analyzer.document_from_text(RFP);
    let report = analyzer.analyze(&document).await.unwrap();
    for category in Category::ALL {
        assert_eq!(report.analysis.render(category), ERROR_SENTINEL);
    }
    assert_eq!(report.sections.len(), 3);
}

#[tokio::test]
async fn blank_document_is_rejected() {
    let analyzer = analyzer(Behavior::Reply(COMBINED));
    let document = analyzer.document_from_text("   \n");
    assert!(matches!(
        analyzer.analyze(&document).await,
        Err(AnalyzerError::NoDocument)
    ));
    assert!(matches!(
        analyzer.check_eligibility(&document, &profile()).await,
        Err(AnalyzerError::NoDocument)
    ));
    assert!(matches!(
        analyzer.index_document(&document).await,
        Err(AnalyzerError::NoDocument)
    ));
}

#[tokio::test]
async fn eligibility_follows_mode() {
    let document = analyzer(Behavior::Reply("")).document_from_text(RFP);

    let prefix = analyzer(Behavior::Reply("Yes. All requirements are met."));
    assert!(prefix.check_eligibility(&document, &profile()).await.unwrap());

    let contains = RfpAnalyzer::builder(client(Behavior::Reply("Answer: YES")))
        .eligibility_mode(EligibilityMode::Contains)
        .build()
        .unwrap();
    assert!(contains.check_eligibility(&document, &profile()).await.unwrap());

    let prefix = analyzer(Behavior::Reply("Answer: YES"));
    assert!(!prefix.check_eligibility(&document, &profile()).await.unwrap());
}

#[tokio::test]
async fn eligibility_is_false_on_timeout_or_transport_failure() {
    for behavior in [Behavior::Hang, Behavior::Fail] {
        let analyzer = analyzer(behavior);
        let document = analyzer.document_from_text(RFP);
        assert!(!analyzer.check_eligibility(&document, &profile()).await.unwrap());
    }
}

#[tokio::test]
async fn per_category_strategy_can_be_selected() {
    let analyzer = RfpAnalyzer::builder(client(Behavior::Reply("- shared finding")))
        .strategy(StrategyKind::PerCategory)
        .build()
        .unwrap();
    assert_eq!(analyzer.strategy_name(), "per_category");

    let report = analyzer
        .analyze(&analyzer.document_from_text(RFP))
        .await
        .unwrap();
    for category in Category::ALL {
        assert_eq!(report.analysis.render(category), "\n• shared finding");
    }
}

#[tokio::test]
async fn retrieval_requires_a_retriever_and_an_index() {
    let bare = analyzer(Behavior::Reply(COMBINED));
    assert!(matches!(
        bare.related_passages("insurance", 3).await,
        Err(AnalyzerError::Retrieval(RetrievalError::NotIndexed))
    ));

    let retriever = Arc::new(SimilarityRetriever::new(Arc::new(HashingEmbedder::new(256)), 8));
    let analyzer = RfpAnalyzer::builder(client(Behavior::Reply(COMBINED)))
        .retriever(retriever)
        .chunking(ChunkingConfig::new(200, 40).unwrap())
        .build()
        .unwrap();
    assert!(matches!(
        analyzer.similar_passages("insurance", 0.5).await,
        Err(AnalyzerError::Retrieval(RetrievalError::NotIndexed))
    ));

    let document = analyzer.document_from_text(RFP);
    let chunks = analyzer.index_document(&document).await.unwrap();
    assert!(chunks > 1);

    let hits = analyzer
        .related_passages("liquidated damages per day", 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].distance <= hits[1].distance);
    assert!(hits[0].chunk.text.contains("damages"));

    assert!(analyzer
        .similar_passages("liquidated damages", 1.01)
        .await
        .unwrap()
        .is_empty());

    assert_eq!(analyzer.similarity_threshold(), 0.8);
    let default_hits = analyzer
        .similar_passages("liquidated damages", analyzer.similarity_threshold())
        .await
        .unwrap();
    assert!(default_hits.iter().all(|hit| hit.similarity >= 0.8));
    assert!(default_hits
        .windows(2)
        .all(|pair| pair[0].similarity >= pair[1].similarity));
}

#[test]
fn from_config_builds_offline_stack() {
    let mut config = Config::for_profile("RFPANALYZERTEST");
    config.llm.provider = "ollama".into();
    config.embedding.provider = "hashing".into();
    config.analysis.strategy = "per-category".into();
    config.analysis.eligibility_mode = "contains".into();
    config.chunking = ChunkingConfig::default();
    config.analysis.similarity_threshold = 0.65;

    let analyzer = RfpAnalyzer::from_config(&config).unwrap();
    assert_eq!(analyzer.strategy_name(), "per_category");
    assert_eq!(analyzer.similarity_threshold(), 0.65);

    config.analysis.strategy = "batch".into();
    assert!(matches!(
        RfpAnalyzer::from_config(&config),
        Err(AnalyzerError::Config(_))
    ));
}
