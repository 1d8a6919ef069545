//! Yes/no bid eligibility decision for a company against a document.

use rfp_core::config::EligibilityMode;
use rfp_core::document::CompanyProfile;
use tracing::{debug, info, warn};

use crate::client::{GenerationParams, ModelClient};

pub struct EligibilityChecker {
    client: ModelClient,
    mode: EligibilityMode,
}

impl EligibilityChecker {
    pub fn new(client: ModelClient, mode: EligibilityMode) -> Self {
        Self { client, mode }
    }

    pub fn mode(&self) -> EligibilityMode {
        self.mode
    }

    pub fn params(&self) -> GenerationParams {
        match self.mode {
            EligibilityMode::Prefix => GenerationParams::new(0.3, 1024),
            EligibilityMode::Contains => GenerationParams::new(0.1, 1024),
        }
    }

    pub fn prompt(&self, rfp_text: &str, profile: &CompanyProfile) -> String {
        let company = profile.to_pretty_json();
        match self.mode {
            EligibilityMode::Prefix => format!(
                "TASK: Determine if the company is eligible to bid on this RFP.\n\n\
                 RFP Text:\n{rfp_text}\n\n\
                 Company Profile:\n{company}\n\n\
                 INSTRUCTIONS:\n\
                 1. Start with YES or NO\n\
                 2. List matching requirements\n\
                 3. List any gaps or concerns"
            ),
            EligibilityMode::Contains => format!(
                "Based on the RFP requirements and company data below, determine if the company is eligible to bid.\n\n\
                 RFP Text:\n{rfp_text}\n\n\
                 Company Data:\n{company}\n\n\
                 Please respond with a clear YES or NO and explain the reasoning."
            ),
        }
    }

    /// Read the decision out of a model response.
    pub fn decide(mode: EligibilityMode, response: &str) -> bool {
        let normalized = response.trim().to_uppercase();
        match mode {
            EligibilityMode::Prefix => normalized.starts_with("YES"),
            EligibilityMode::Contains => normalized.contains("YES"),
        }
    }

    /// Ask the model whether the company may bid. Any model-layer failure
    /// counts as "not eligible".
    pub async fn check(&self, rfp_text: &str, profile: &CompanyProfile) -> bool {
        let prompt = self.prompt(rfp_text, profile);
        match self.client.generate(&prompt, self.params()).await {
            Ok(response) => {
                debug!("eligibility analysis:\n{response}");
                let eligible = Self::decide(self.mode, &response);
                info!(mode = %self.mode, eligible, "eligibility decided");
                eligible
            }
            Err(e) => {
                warn!(kind = ?e.failure_kind(), error = %e, "eligibility check failed");
                false
            }
        }
    }
}
