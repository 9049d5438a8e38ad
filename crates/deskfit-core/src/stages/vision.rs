//! Vision Analyzer: image-grounded risk detection

use crate::backend::{CompletionRequest, LanguageModel};
use crate::config::ApiKey;
use crate::error::UpstreamError;
use crate::prompts;
use crate::records::DetectedRisks;
use crate::types::WorkspaceInput;
use std::sync::Arc;

/// Sends the photo plus a focus-conditioned instruction to the model
#[derive(Clone)]
pub struct VisionAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl VisionAnalyzer {
    /// Create new analyzer
    #[inline]
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// One multimodal completion call
    ///
    /// # Errors
    /// Authentication failure, unsupported image, timeout or rate limit,
    /// all returned as reported by the service.
    pub async fn analyze(
        &self,
        input: &WorkspaceInput,
        credential: &ApiKey,
    ) -> Result<DetectedRisks, UpstreamError> {
        let request = CompletionRequest::text(
            prompts::analyzer_instructions(input.focus_area, &input.goal),
            prompts::ANALYZER_PROMPT,
        )
        .with_image(input.image.clone());

        tracing::debug!(
            image_bytes = input.image.len(),
            media_type = input.image.media_type(),
            "sending workspace photo"
        );
        let text = self.model.complete(credential, request).await?;
        Ok(DetectedRisks::new(text))
    }
}

impl std::fmt::Debug for VisionAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionAnalyzer").finish_non_exhaustive()
    }
}
