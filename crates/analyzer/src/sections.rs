//! Heuristic, regex-driven segmentation of an RFP into named sections.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use rfp_core::document::SectionName;
use rfp_core::error::ConfigError;
use tracing::debug;

/// Characters after a section's start before another section may begin.
pub const DEFAULT_LOOKAHEAD: usize = 100;

const STANDARD_PATTERNS: [(SectionName, &str); 3] = [
    (
        SectionName::Eligibility,
        r"eligibility\s+requirements|qualification\s+criteria",
    ),
    (
        SectionName::Submission,
        r"submission\s+requirements|proposal\s+format",
    ),
    (
        SectionName::Terms,
        r"terms\s+and\s+conditions|contract\s+terms",
    ),
];

#[derive(Debug, Clone)]
pub struct SectionSplitter {
    rules: Vec<(SectionName, Regex)>,
    lookahead: usize,
}

impl SectionSplitter {
    /// Compile case-insensitive trigger patterns, one per section.
    pub fn new(patterns: &[(SectionName, &str)], lookahead: usize) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|(name, pattern)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (*name, re))
                    .map_err(|e| ConfigError::InvalidPattern {
                        section: name.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules, lookahead })
    }

    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(&STANDARD_PATTERNS, DEFAULT_LOOKAHEAD)
    }

    /// Map each section with at least one trigger match to its text.
    ///
    /// A section runs from its trigger to the nearest trigger of another
    /// section found at least `lookahead` characters later, or to the end
    /// of the text. When a trigger matches more than once the last match
    /// wins.
    pub fn split(&self, text: &str) -> BTreeMap<SectionName, String> {
        let mut sections = BTreeMap::new();

        for (name, pattern) in &self.rules {
            for m in pattern.find_iter(text) {
                let start = m.start();
                let end = self.boundary(text, *name, start).unwrap_or(text.len());
                sections.insert(*name, text[start..end].trim().to_string());
            }
        }

        for (name, body) in &sections {
            debug!(section = %name, chars = body.chars().count(), "detected section");
        }
        sections
    }

    /// Byte offset where the section starting at `start` ends, if another
    /// section's trigger follows it.
    fn boundary(&self, text: &str, current: SectionName, start: usize) -> Option<usize> {
        let (skip, _) = text[start..].char_indices().nth(self.lookahead)?;
        let search_from = start + skip;

        self.rules
            .iter()
            .filter(|(name, _)| *name != current)
            .filter_map(|(_, re)| re.find_at(text, search_from).map(|m| m.start()))
            .min()
    }
}
