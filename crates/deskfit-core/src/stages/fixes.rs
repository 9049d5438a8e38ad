//! Fix Synthesizer

use crate::backend::{CompletionRequest, LanguageModel};
use crate::config::ApiKey;
use crate::error::UpstreamError;
use crate::prompts;
use crate::records::{FixPlan, PrioritizedRisks};
use crate::types::{FocusArea, ImprovementGoal};
use std::sync::Arc;

/// Produces remediation steps, one group per prioritized risk
#[derive(Clone)]
pub struct FixSynthesizer {
    model: Arc<dyn LanguageModel>,
}

impl FixSynthesizer {
    /// Create new synthesizer
    #[inline]
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Single text completion; the user's focus and goal are appended to the
    /// prioritized risks
    ///
    /// # Errors
    /// Any model failure, returned as reported by the service.
    pub async fn synthesize(
        &self,
        prioritized: &PrioritizedRisks,
        focus: FocusArea,
        goal: &ImprovementGoal,
        credential: &ApiKey,
    ) -> Result<FixPlan, UpstreamError> {
        let request = CompletionRequest::text(
            prompts::FIX_INSTRUCTIONS,
            prompts::fix_prompt(prioritized.as_str(), focus, goal),
        );
        let text = self.model.complete(credential, request).await?;
        Ok(FixPlan::new(text))
    }
}

impl std::fmt::Debug for FixSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixSynthesizer").finish_non_exhaustive()
    }
}
