use std::collections::BTreeMap;

use rfp_core::document::SectionName;
use serde::Serialize;

use crate::sections::SectionSplitter;

/// A loaded RFP: raw text plus the sections detected in it.
///
/// Sections are computed once at construction. Reloading produces a new
/// `Document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    text: String,
    sections: BTreeMap<SectionName, String>,
}

impl Document {
    pub fn from_text(text: impl Into<String>, splitter: &SectionSplitter) -> Self {
        let text = text.into();
        let sections = splitter.split(&text);
        Self { text, sections }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when there is nothing to analyze.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn sections(&self) -> &BTreeMap<SectionName, String> {
        &self.sections
    }

    /// Text of `name`, or `""` when the section was not detected.
    pub fn section(&self, name: SectionName) -> &str {
        self.sections.get(&name).map(String::as_str).unwrap_or("")
    }

    /// Like [`Document::section`], by name. Unknown names give `""`.
    pub fn get_section(&self, name: &str) -> &str {
        SectionName::parse(name)
            .map(|n| self.section(n))
            .unwrap_or("")
    }
}
