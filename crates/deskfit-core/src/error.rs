//! Error types for deskfit
//!
//! Every failure is surfaced to the user at the point it happens:
//! - Missing form input (image, focus area, goal)
//! - Missing or rejected API credentials
//! - Upstream model or search service failures
//! - User-initiated cancellation between stages

use crate::config::CredentialKind;
use crate::types::Stage;

/// Main deskfit error type
#[derive(Debug, thiserror::Error)]
pub enum DeskfitError {
    /// The user omitted part of the form
    #[error(transparent)]
    MissingInput(#[from] MissingInputError),

    /// Credential missing or rejected
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Upstream failure during a pipeline stage
    #[error("{stage} failed: {error}")]
    Upstream {
        /// Stage that was running
        stage: Stage,
        /// The service failure, verbatim
        error: UpstreamError,
    },

    /// Run aborted by the user between stages
    #[error("run cancelled before {0}")]
    Cancelled(Stage),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error while reading the photo or writing the report
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeskfitError {
    /// Wrap an upstream failure, promoting authentication failures to
    /// [`CredentialError::Rejected`]
    #[must_use]
    pub fn from_upstream(stage: Stage, error: UpstreamError) -> Self {
        if error.kind == UpstreamErrorKind::Authentication {
            let credential = match error.service {
                Service::Search => CredentialKind::Search,
                Service::Model => CredentialKind::Model,
            };
            return Self::Credential(CredentialError::Rejected { credential, error });
        }
        Self::Upstream { stage, error }
    }

    /// Stage the failure is attributed to, if any
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Upstream { stage, .. } | Self::Cancelled(stage) => Some(*stage),
            _ => None,
        }
    }

    /// Every failure can be fixed by the user and the whole run retried
    #[inline]
    #[must_use]
    pub fn is_user_recoverable(&self) -> bool {
        true
    }
}

/// Form fields the user left out
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingInputError {
    /// No workspace photo uploaded
    #[error("please upload a workspace photo to proceed")]
    Image,

    /// Photo uploaded but empty
    #[error("the workspace photo is empty")]
    EmptyImage,

    /// No focus area selected
    #[error("please select a focus area")]
    FocusArea,

    /// No improvement goal given
    #[error("please choose or describe an improvement goal")]
    Goal,
}

/// Credential errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Key absent or blank
    #[error("please provide your {0} API key")]
    Missing(CredentialKind),

    /// The service refused the key
    #[error("{credential} API key was rejected: {error}")]
    Rejected {
        /// Which key was refused
        credential: CredentialKind,
        /// The upstream response
        error: UpstreamError,
    },
}

/// External collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Multimodal language model
    Model,
    /// Web search
    Search,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => f.write_str("language model"),
            Self::Search => f.write_str("web search"),
        }
    }
}

/// Upstream failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// 401/403 from the service
    Authentication,
    /// 429 from the service
    RateLimited,
    /// Client timeout
    Timeout,
    /// Body could not be decoded or lacked the expected fields
    MalformedResponse,
    /// Any other non-success status
    Service,
    /// Connection-level failure
    Transport,
}

/// Model or search service failure, carried verbatim
#[derive(Debug, Clone, thiserror::Error)]
#[error("{service} {kind:?}: {message}")]
pub struct UpstreamError {
    /// Which service failed
    pub service: Service,
    /// Failure class
    pub kind: UpstreamErrorKind,
    /// Message as reported by the service or client
    pub message: String,
}

impl UpstreamError {
    /// Create new upstream error
    #[inline]
    #[must_use]
    pub fn new(service: Service, kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            service,
            kind,
            message: message.into(),
        }
    }

    /// Language model failure
    #[inline]
    #[must_use]
    pub fn model(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self::new(Service::Model, kind, message)
    }

    /// Search service failure
    #[inline]
    #[must_use]
    pub fn search(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self::new(Service::Search, kind, message)
    }

    /// Classify an HTTP status code
    #[must_use]
    pub fn kind_for_status(status: u16) -> UpstreamErrorKind {
        match status {
            401 | 403 => UpstreamErrorKind::Authentication,
            408 | 504 => UpstreamErrorKind::Timeout,
            429 => UpstreamErrorKind::RateLimited,
            _ => UpstreamErrorKind::Service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let err = DeskfitError::from(MissingInputError::Image);
        assert!(err.to_string().contains("upload a workspace photo"));
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn upstream_error_keeps_message_verbatim() {
        let source = UpstreamError::model(UpstreamErrorKind::RateLimited, "slow down");
        let err = DeskfitError::from_upstream(Stage::Analyze, source);
        assert!(err.to_string().contains("slow down"));
        assert_eq!(err.stage(), Some(Stage::Analyze));
    }

    #[test]
    fn authentication_failure_becomes_credential_error() {
        let source = UpstreamError::search(UpstreamErrorKind::Authentication, "Invalid API key");
        let err = DeskfitError::from_upstream(Stage::FindProducts, source);
        match err {
            DeskfitError::Credential(CredentialError::Rejected { credential, error }) => {
                assert_eq!(credential, CredentialKind::Search);
                assert_eq!(error.message, "Invalid API key");
            }
            other => panic!("expected rejected credential, got {other:?}"),
        }
    }

    #[test]
    fn status_classification() {
        assert_eq!(UpstreamError::kind_for_status(401), UpstreamErrorKind::Authentication);
        assert_eq!(UpstreamError::kind_for_status(429), UpstreamErrorKind::RateLimited);
        assert_eq!(UpstreamError::kind_for_status(504), UpstreamErrorKind::Timeout);
        assert_eq!(UpstreamError::kind_for_status(500), UpstreamErrorKind::Service);
    }

    #[test]
    fn all_errors_recoverable() {
        assert!(DeskfitError::Cancelled(Stage::Prioritize).is_user_recoverable());
        assert!(DeskfitError::Config("bad".to_string()).is_user_recoverable());
    }
}
