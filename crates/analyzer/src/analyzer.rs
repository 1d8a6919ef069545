use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rfp_core::analysis::AnalysisResult;
use rfp_core::config::{ChunkingConfig, Config, EligibilityMode, StrategyKind};
use rfp_core::document::{CompanyProfile, SectionName};
use rfp_ingest::embedding::create_embedder;
use rfp_ingest::{
    FileTextExtractor, RetrievalError, RetrievedChunk, SimilarityRetriever, TextExtractor,
};
use rfp_llm::{EligibilityChecker, ExtractionStrategy, ModelClient, StructuredExtractor};
use serde::Serialize;
use tracing::info;

use crate::document::Document;
use crate::error::AnalyzerError;
use crate::sections::SectionSplitter;

/// Cutoff for [`RfpAnalyzer::similar_passages`] when none is configured.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Output of [`RfpAnalyzer::analyze`]: the four categories plus the
/// detected sections.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub sections: BTreeMap<SectionName, String>,
}

/// Loads RFPs and runs structured analysis, eligibility checks and
/// passage retrieval over them.
pub struct RfpAnalyzer {
    extractor: StructuredExtractor,
    eligibility: EligibilityChecker,
    splitter: SectionSplitter,
    text_extractor: Arc<dyn TextExtractor>,
    retriever: Option<Arc<SimilarityRetriever>>,
    chunking: ChunkingConfig,
    similarity_threshold: f32,
}

impl RfpAnalyzer {
    pub fn builder(client: ModelClient) -> RfpAnalyzerBuilder {
        RfpAnalyzerBuilder::new(client)
    }

    /// Wire providers, embedder and retriever from configuration.
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        config.validate()?;

        let client = ModelClient::from_config(&config.llm)?;
        let embedder = create_embedder(
            &config.embedding,
            &config.llm.ollama_url,
            config.llm.openai_api_key.as_deref(),
            config.llm.openai_base_url.as_deref(),
        )
        .map_err(RetrievalError::from)?;
        let retriever = SimilarityRetriever::new(embedder, config.embedding.batch_size);

        Self::builder(client)
            .strategy(config.analysis.strategy()?)
            .eligibility_mode(config.analysis.eligibility_mode()?)
            .chunking(config.chunking)
            .similarity_threshold(config.analysis.similarity_threshold)
            .retriever(Arc::new(retriever))
            .build()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.extractor.strategy_name()
    }

    /// Threshold used by callers that don't pass their own to
    /// [`RfpAnalyzer::similar_passages`].
    pub fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    /// Extract text from `path` and detect its sections.
    pub fn load(&self, path: &Path) -> Result<Document, AnalyzerError> {
        let text = self.text_extractor.extract_text(path)?;
        let document = Document::from_text(text, &self.splitter);
        info!(
            path = %path.display(),
            chars = document.text().chars().count(),
            sections = document.sections().len(),
            "document loaded"
        );
        Ok(document)
    }

    /// Build a document from text already in memory.
    pub fn document_from_text(&self, text: impl Into<String>) -> Document {
        Document::from_text(text, &self.splitter)
    }

    /// Run the structured extraction. Model-layer failures show up as
    /// failed categories, never as an error.
    pub async fn analyze(&self, document: &Document) -> Result<AnalysisReport, AnalyzerError> {
        if document.is_blank() {
            return Err(AnalyzerError::NoDocument);
        }
        let analysis = self.extractor.extract(document.text()).await;
        Ok(AnalysisReport {
            analysis,
            sections: document.sections().clone(),
        })
    }

    /// Whether the company may bid. `false` on any model-layer failure.
    pub async fn check_eligibility(
        &self,
        document: &Document,
        profile: &CompanyProfile,
    ) -> Result<bool, AnalyzerError> {
        if document.is_blank() {
            return Err(AnalyzerError::NoDocument);
        }
        Ok(self.eligibility.check(document.text(), profile).await)
    }

    /// Chunk and index `document` for passage retrieval.
    pub async fn index_document(&self, document: &Document) -> Result<usize, AnalyzerError> {
        if document.is_blank() {
            return Err(AnalyzerError::NoDocument);
        }
        let retriever = self.retriever()?;
        Ok(retriever.index_text(document.text(), &self.chunking).await?)
    }

    /// The `k` indexed passages nearest to `question`.
    pub async fn related_passages(
        &self,
        question: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, AnalyzerError> {
        Ok(self.retriever()?.query(question, k).await?)
    }

    /// Indexed passages with cosine similarity to `text` of at least `threshold`.
    pub async fn similar_passages(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<RetrievedChunk>, AnalyzerError> {
        Ok(self.retriever()?.most_similar(text, threshold).await?)
    }

    fn retriever(&self) -> Result<&SimilarityRetriever, AnalyzerError> {
        self.retriever
            .as_deref()
            .ok_or(AnalyzerError::Retrieval(RetrievalError::NotIndexed))
    }
}

/// Step-by-step construction of an [`RfpAnalyzer`].
pub struct RfpAnalyzerBuilder {
    client: ModelClient,
    strategy: Option<Box<dyn ExtractionStrategy>>,
    strategy_kind: StrategyKind,
    eligibility_mode: EligibilityMode,
    splitter: Option<SectionSplitter>,
    text_extractor: Arc<dyn TextExtractor>,
    retriever: Option<Arc<SimilarityRetriever>>,
    chunking: ChunkingConfig,
    similarity_threshold: f32,
}

impl RfpAnalyzerBuilder {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            strategy: None,
            strategy_kind: StrategyKind::Combined,
            eligibility_mode: EligibilityMode::Prefix,
            splitter: None,
            text_extractor: Arc::new(FileTextExtractor),
            retriever: None,
            chunking: ChunkingConfig::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Pick one of the built-in strategies (default: combined).
    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy_kind = kind;
        self.strategy = None;
        self
    }

    /// Use a custom extraction strategy.
    pub fn extraction_strategy(mut self, strategy: Box<dyn ExtractionStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn eligibility_mode(mut self, mode: EligibilityMode) -> Self {
        self.eligibility_mode = mode;
        self
    }

    pub fn section_splitter(mut self, splitter: SectionSplitter) -> Self {
        self.splitter = Some(splitter);
        self
    }

    pub fn text_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.text_extractor = extractor;
        self
    }

    pub fn retriever(mut self, retriever: Arc<SimilarityRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<RfpAnalyzer, AnalyzerError> {
        self.chunking.validate()?;
        let splitter = match self.splitter {
            Some(splitter) => splitter,
            None => SectionSplitter::standard()?,
        };
        let extractor = match self.strategy {
            Some(strategy) => StructuredExtractor::new(self.client.clone(), strategy),
            None => StructuredExtractor::for_kind(self.client.clone(), self.strategy_kind),
        };

        Ok(RfpAnalyzer {
            extractor,
            eligibility: EligibilityChecker::new(self.client, self.eligibility_mode),
            splitter,
            text_extractor: self.text_extractor,
            retriever: self.retriever,
            chunking: self.chunking,
            similarity_threshold: self.similarity_threshold,
        })
    }
}
