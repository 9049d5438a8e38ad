//! Backend seams for the two upstream collaborators
//!
//! Implement [`LanguageModel`] and [`WebSearch`] to plug in a service.
//! Backends never hold credentials; each call receives its key.

use crate::config::ApiKey;
use crate::error::UpstreamError;
use crate::types::WorkspaceImage;
use serde::{Deserialize, Serialize};

/// One completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System-level instructions for the model
    pub instructions: String,
    /// User message text
    pub prompt: String,
    /// Attached photo, for the vision stage only
    pub image: Option<WorkspaceImage>,
}

impl CompletionRequest {
    /// Text-only request
    #[inline]
    #[must_use]
    pub fn text(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
            image: None,
        }
    }

    /// Attach an image
    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: WorkspaceImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Ranked web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,
    /// Target URL
    pub link: String,
    /// Result snippet
    #[serde(default)]
    pub snippet: String,
}

/// Multimodal language model
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Perform one completion and return the model's text verbatim
    async fn complete(
        &self,
        credential: &ApiKey,
        request: CompletionRequest,
    ) -> Result<String, UpstreamError>;
}

/// Web search service
#[async_trait::async_trait]
pub trait WebSearch: Send + Sync {
    /// Run one query, results in rank order
    async fn search(&self, credential: &ApiKey, query: &str)
        -> Result<Vec<SearchHit>, UpstreamError>;
}
