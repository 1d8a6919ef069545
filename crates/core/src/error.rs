use thiserror::Error;

/// Invalid parameters or settings. Always propagated to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid chunking parameters: size={size}, overlap={overlap} (need 0 < overlap < size)")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("invalid pattern for section '{section}': {reason}")]
    InvalidPattern { section: String, reason: String },

    #[error("company profile must be a JSON object, got {0}")]
    InvalidProfile(String),
}
