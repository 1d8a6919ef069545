use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Logical sections detected in an RFP document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Eligibility,
    Submission,
    Terms,
}

impl SectionName {
    pub const ALL: [SectionName; 3] = [
        SectionName::Eligibility,
        SectionName::Submission,
        SectionName::Terms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Eligibility => "eligibility",
            SectionName::Submission => "submission",
            SectionName::Terms => "terms",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form company data passed verbatim into eligibility prompts.
///
/// No structure is assumed beyond being a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyProfile(Map<String, Value>);

impl CompanyProfile {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ConfigError::InvalidProfile(kind_of(&other).to_string())),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidProfile(format!("unparseable JSON ({e})")))?;
        Self::from_value(value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Pretty-printed JSON, two-space indent, as embedded in prompts.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
