use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RFP_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RFP_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            analysis: AnalysisConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }

    /// Reject settings that would only fail later, deep inside a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking.validate()?;
        self.analysis.strategy()?;
        self.analysis.eligibility_mode()?;
        if self.embedding.dimensions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "EMBEDDING_DIMENSIONS".into(),
                value: "0".into(),
            });
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "LLM_TIMEOUT_SECS".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  llm:        provider={}, configured={}, timeout={}s",
            self.llm.provider,
            self.llm.is_configured(),
            self.llm.timeout_secs
        );
        tracing::info!(
            "  embedding:  provider={}, dimensions={}, batch={}",
            self.embedding.provider,
            self.embedding.dimensions,
            self.embedding.batch_size
        );
        tracing::info!(
            "  chunking:   size={}, overlap={}",
            self.chunking.size,
            self.chunking.overlap
        );
        tracing::info!(
            "  analysis:   strategy={}, eligibility={}",
            self.analysis.strategy,
            self.analysis.eligibility_mode
        );
    }
}

// ── LLM ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    /// Upper bound for a single model call.
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini"),
            gemini_api_key: profiled_env_opt(p, "GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-2.0-flash"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            ollama_url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            ollama_model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", 60),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hashing", "ollama", "openai"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "hashing"),
            model: profiled_env_or(p, "EMBEDDING_MODEL", "nomic-embed-text"),
            dimensions: profiled_env_usize(p, "EMBEDDING_DIMENSIONS", 384),
            batch_size: profiled_env_usize(p, "EMBEDDING_BATCH_SIZE", 32),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

/// Sliding-window parameters, measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self, ConfigError> {
        let config = Self { size, overlap };
        config.validate()?;
        Ok(config)
    }

    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            size: profiled_env_usize(p, "CHUNK_SIZE", defaults.size),
            overlap: profiled_env_usize(p, "CHUNK_OVERLAP", defaults.overlap),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overlap == 0 || self.overlap >= self.size {
            return Err(ConfigError::InvalidChunking {
                size: self.size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

// ── Analysis ──────────────────────────────────────────────────

/// Call shape used to obtain the four analysis categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// One prompt, one response carrying all categories under headers.
    Combined,
    /// One prompt per category, issued concurrently.
    PerCategory,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "combined" => Ok(StrategyKind::Combined),
            "per_category" => Ok(StrategyKind::PerCategory),
            _ => Err(ConfigError::InvalidValue {
                key: "ANALYSIS_STRATEGY".into(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Combined => f.write_str("combined"),
            StrategyKind::PerCategory => f.write_str("per_category"),
        }
    }
}

/// How an eligibility response is turned into a yes/no decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityMode {
    /// The response must begin with YES.
    Prefix,
    /// The response must mention YES anywhere.
    Contains,
}

impl FromStr for EligibilityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prefix" => Ok(EligibilityMode::Prefix),
            "contains" => Ok(EligibilityMode::Contains),
            _ => Err(ConfigError::InvalidValue {
                key: "ELIGIBILITY_MODE".into(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EligibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityMode::Prefix => f.write_str("prefix"),
            EligibilityMode::Contains => f.write_str("contains"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub strategy: String,
    pub eligibility_mode: String,
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl AnalysisConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            strategy: profiled_env_or(p, "ANALYSIS_STRATEGY", "combined"),
            eligibility_mode: profiled_env_or(p, "ELIGIBILITY_MODE", "prefix"),
            top_k: profiled_env_usize(p, "RETRIEVAL_TOP_K", 3),
            similarity_threshold: profiled_env_or(p, "SIMILARITY_THRESHOLD", "0.8")
                .parse()
                .unwrap_or(0.8),
        }
    }

    pub fn strategy(&self) -> Result<StrategyKind, ConfigError> {
        self.strategy.parse()
    }

    pub fn eligibility_mode(&self) -> Result<EligibilityMode, ConfigError> {
        self.eligibility_mode.parse()
    }
}
