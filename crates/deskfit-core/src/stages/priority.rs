//! Risk Prioritizer
//!
//! Ordering is whatever the model emits; there is no scoring rubric and no
//! tie-break rule.

use crate::backend::{CompletionRequest, LanguageModel};
use crate::config::ApiKey;
use crate::error::UpstreamError;
use crate::prompts;
use crate::records::{DetectedRisks, PrioritizedRisks};
use std::sync::Arc;

/// Annotates detected risks with severity and urgency order
#[derive(Clone)]
pub struct RiskPrioritizer {
    model: Arc<dyn LanguageModel>,
}

impl RiskPrioritizer {
    /// Create new prioritizer
    #[inline]
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Single text completion over the detected risks, passed verbatim
    ///
    /// # Errors
    /// Any model failure, returned as reported by the service.
    pub async fn prioritize(
        &self,
        risks: &DetectedRisks,
        credential: &ApiKey,
    ) -> Result<PrioritizedRisks, UpstreamError> {
        let request =
            CompletionRequest::text(prompts::PRIORITIZER_INSTRUCTIONS, risks.as_str());
        let text = self.model.complete(credential, request).await?;
        Ok(PrioritizedRisks::new(text))
    }
}

impl std::fmt::Debug for RiskPrioritizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskPrioritizer").finish_non_exhaustive()
    }
}
