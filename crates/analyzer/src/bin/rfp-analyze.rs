use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rfp_analyzer::RfpAnalyzer;
use rfp_core::analysis::Category;
use rfp_core::config::{self, Config, StrategyKind};
use rfp_core::document::{CompanyProfile, SectionName};
use rfp_ingest::RetrievedChunk;
use serde_json::json;
use tracing::info;

/// Analyze an RFP document: sections, requirements, risks and eligibility.
#[derive(Parser, Debug)]
#[command(name = "rfp-analyze", about = "Structured analysis of RFP documents")]
struct Args {
    /// Document to analyze (.pdf, .txt or .md)
    path: PathBuf,

    /// Company profile as a JSON object; enables the eligibility check
    #[arg(long)]
    company: Option<String>,

    /// Extraction strategy: combined or per-category (overrides ANALYSIS_STRATEGY)
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Question to answer from indexed passages
    #[arg(long)]
    question: Option<String>,

    /// Number of passages to return for --question
    #[arg(long)]
    top_k: Option<usize>,

    /// Text to match against indexed passages by cosine similarity
    #[arg(long)]
    similar: Option<String>,

    /// Minimum similarity for --similar (overrides SIMILARITY_THRESHOLD)
    #[arg(long)]
    threshold: Option<f32>,

    /// Print a single JSON object instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    config::load_dotenv();
    let mut config = Config::from_env();
    if let Some(strategy) = args.strategy {
        config.analysis.strategy = strategy.to_string();
    }
    config.log_summary();

    let profile = args
        .company
        .as_deref()
        .map(CompanyProfile::from_json)
        .transpose()
        .context("invalid --company")?;

    let analyzer = RfpAnalyzer::from_config(&config).context("failed to build analyzer")?;
    let document = analyzer
        .load(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    let report = analyzer.analyze(&document).await?;

    let eligible = match &profile {
        Some(profile) => Some(analyzer.check_eligibility(&document, profile).await?),
        None => None,
    };

    if args.question.is_some() || args.similar.is_some() {
        let chunks = analyzer.index_document(&document).await?;
        info!(chunks, "indexed document for retrieval");
    }

    let passages = match &args.question {
        Some(question) => {
            let k = args.top_k.unwrap_or(config.analysis.top_k);
            Some(analyzer.related_passages(question, k).await?)
        }
        None => None,
    };

    let similar = match &args.similar {
        Some(text) => {
            let threshold = args.threshold.unwrap_or(analyzer.similarity_threshold());
            Some(analyzer.similar_passages(text, threshold).await?)
        }
        None => None,
    };

    if args.json {
        let output = json!({
            "report": report,
            "eligible": eligible,
            "passages": passages,
            "similar": similar,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("== Sections ==");
    for name in SectionName::ALL {
        let body = document.section(name);
        if body.is_empty() {
            println!("\n[{name}] (not found)");
        } else {
            println!("\n[{name}]\n{body}");
        }
    }

    println!("\n== Analysis ({}) ==", analyzer.strategy_name());
    for category in Category::ALL {
        println!("\n{}: {}", category.header(), report.analysis.render(category));
    }

    if let Some(eligible) = eligible {
        println!("\n== Eligibility ==\n{}", if eligible { "ELIGIBLE" } else { "NOT ELIGIBLE" });
    }

    if let Some(passages) = passages {
        print_hits("Related passages", &passages);
    }
    if let Some(similar) = similar {
        print_hits("Similar passages", &similar);
    }

    Ok(())
}

fn print_hits(title: &str, hits: &[RetrievedChunk]) {
    println!("\n== {title} ==");
    if hits.is_empty() {
        println!("(none)");
    }
    for hit in hits {
        println!(
            "\n-- chunk {} (offset {}, distance {:.4}, similarity {:.3})\n{}",
            hit.chunk.index, hit.chunk.start_offset, hit.distance, hit.similarity, hit.chunk.text
        );
    }
}
