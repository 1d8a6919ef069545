use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Rendered value of a category that parsed cleanly but yielded nothing.
pub const NO_ITEMS_SENTINEL: &str = "No items identified";

/// Rendered value of a category whose extraction failed.
pub const ERROR_SENTINEL: &str = "Analysis failed";

/// The four fixed analysis dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Eligibility,
    Compliance,
    Submission,
    Risks,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Eligibility,
        Category::Compliance,
        Category::Submission,
        Category::Risks,
    ];

    /// Key used in serialized results.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Eligibility => "eligibility_criteria",
            Category::Compliance => "compliance_requirements",
            Category::Submission => "submission_requirements",
            Category::Risks => "risk_analysis",
        }
    }

    /// Header that demarcates this category in a combined model response.
    pub fn header(&self) -> &'static str {
        match self {
            Category::Eligibility => "ELIGIBILITY REQUIREMENTS",
            Category::Compliance => "COMPLIANCE REQUIREMENTS",
            Category::Submission => "SUBMISSION REQUIREMENTS",
            Category::Risks => "RISK FACTORS",
        }
    }

    /// Question asked when the category is queried on its own.
    pub fn question(&self) -> &'static str {
        match self {
            Category::Eligibility => {
                "What are the mandatory eligibility criteria and requirements to bid?"
            }
            Category::Compliance => {
                "What are the key compliance requirements and potential deal-breakers?"
            }
            Category::Submission => {
                "What are the detailed submission requirements including format, deadlines etc?"
            }
            Category::Risks => "What are the potential contract risks and unfavorable clauses?",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Category::Eligibility => 0,
            Category::Compliance => 1,
            Category::Submission => 2,
            Category::Risks => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a category carries the error sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Timeout,
    EmptyResponse,
    MalformedResponse,
    NotConfigured,
    MissingEligibility,
}

/// Failure detail retained for logging; callers only ever see the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl AnalysisFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}

/// Outcome for a single category: exactly one of items, nothing, or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Items(Vec<String>),
    NoItems,
    Failed(AnalysisFailure),
}

impl CategoryOutcome {
    pub fn from_items(items: Vec<String>) -> Self {
        if items.is_empty() {
            CategoryOutcome::NoItems
        } else {
            CategoryOutcome::Items(items)
        }
    }

    pub fn items(&self) -> &[String] {
        match self {
            CategoryOutcome::Items(items) => items,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CategoryOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match self {
            CategoryOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// `"\n• a\n• b"` for items, otherwise the matching sentinel.
    pub fn render(&self) -> String {
        match self {
            CategoryOutcome::Items(items) => items.iter().map(|i| format!("\n• {i}")).collect(),
            CategoryOutcome::NoItems => NO_ITEMS_SENTINEL.to_string(),
            CategoryOutcome::Failed(_) => ERROR_SENTINEL.to_string(),
        }
    }
}

/// Per-category analysis of one document. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    outcomes: [CategoryOutcome; 4],
}

impl AnalysisResult {
    pub fn from_fn(mut f: impl FnMut(Category) -> CategoryOutcome) -> Self {
        Self {
            outcomes: std::array::from_fn(|i| f(Category::ALL[i])),
        }
    }

    /// Every category set to the shared error sentinel.
    pub fn failed(failure: AnalysisFailure) -> Self {
        Self::from_fn(|_| CategoryOutcome::Failed(failure.clone()))
    }

    pub fn get(&self, category: Category) -> &CategoryOutcome {
        &self.outcomes[category.slot()]
    }

    pub fn set(&mut self, category: Category, outcome: CategoryOutcome) {
        self.outcomes[category.slot()] = outcome;
    }

    pub fn render(&self, category: Category) -> String {
        self.get(category).render()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryOutcome)> {
        Category::ALL.into_iter().zip(self.outcomes.iter())
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(CategoryOutcome::is_failed)
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outcomes.len()))?;
        for (category, outcome) in self.iter() {
            map.serialize_entry(category.key(), &outcome.render())?;
        }
        map.end()
    }
}
