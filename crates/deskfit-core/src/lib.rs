//! deskfit core - workspace photo to ergonomic report
//!
//! Turns one workspace photo plus a focus area and an improvement goal into a
//! Markdown ergonomic report by chaining four model-backed stages:
//! - Vision analysis of the photo
//! - Risk prioritization
//! - Fix synthesis
//! - Product search
//!
//! # Example
//!
//! ```rust,ignore
//! use deskfit_core::prelude::*;
//!
//! # async fn example(model: Arc<dyn LanguageModel>, search: Arc<dyn WebSearch>) -> Result<(), DeskfitError> {
//! let config = DeskfitConfig::new();
//! let pipeline = ReportPipeline::new(&config, model, search);
//!
//! let input = PreferenceForm::new()
//!     .with_image(WorkspaceImage::from_path("desk_photo.jpg".as_ref())?)
//!     .with_focus_area(FocusArea::Posture)
//!     .with_goal_text("reduce back pain")
//!     .collect()?;
//!
//! let report = pipeline.run(&Credentials::new("sk-...", "serp-..."), &input).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod backend;
pub mod collect;
pub mod config;
pub mod delivery;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod records;
pub mod report;
pub mod stages;
pub mod types;

// Re-exports for convenience
pub use backend::{CompletionRequest, LanguageModel, SearchHit, WebSearch};
pub use collect::PreferenceForm;
pub use config::{ApiKey, CredentialKind, Credentials, DeskfitConfig};
pub use delivery::{download, render, to_html, DownloadFile};
pub use error::{
    CredentialError, DeskfitError, MissingInputError, Service, UpstreamError, UpstreamErrorKind,
};
pub use pipeline::{ReportPipeline, ReportRun};
pub use records::{DetectedRisks, FixPlan, PrioritizedRisks, ProductLink, ProductSuggestions};
pub use report::{assemble, Report, Section};
pub use types::{
    FocusArea, ImprovementGoal, RunId, RunStatus, Stage, UnknownFocusArea, WorkspaceImage,
    WorkspaceInput,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with deskfit
    pub use crate::{
        Credentials, DeskfitConfig, DeskfitError, FocusArea, ImprovementGoal, LanguageModel,
        PreferenceForm, Report, ReportPipeline, WebSearch, WorkspaceImage, WorkspaceInput,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
