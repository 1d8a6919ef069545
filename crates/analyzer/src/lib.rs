//! RFP analysis: section detection, structured extraction, eligibility
//! checks and optional passage retrieval over a loaded document.

pub mod analyzer;
pub mod document;
pub mod error;
pub mod sections;

pub use analyzer::{AnalysisReport, RfpAnalyzer, RfpAnalyzerBuilder};
pub use document::Document;
pub use error::AnalyzerError;
pub use sections::SectionSplitter;
