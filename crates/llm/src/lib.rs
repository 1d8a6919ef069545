pub mod client;
pub mod eligibility;
pub mod extractor;
pub mod provider;
pub mod providers;

pub use client::{GenerationParams, ModelClient};
pub use eligibility::EligibilityChecker;
pub use extractor::{CombinedPrompt, ExtractionStrategy, PerCategoryPrompts, StructuredExtractor};
pub use provider::{LlmError, LlmProvider, Message, Role};
