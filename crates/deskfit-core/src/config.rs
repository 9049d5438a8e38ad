//! Run configuration and session credentials
//!
//! Credentials live only in memory and are passed explicitly to every
//! stage call; nothing here is ever persisted.

use crate::error::{CredentialError, DeskfitError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default chat model (vision capable)
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Default OpenAI-compatible API base
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default SerpApi endpoint
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
/// Deterministic report file name
pub const DEFAULT_REPORT_FILE_NAME: &str = "workspace_optimization_report.md";

/// Which secret a credential error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Language model API key
    Model,
    /// Search API key
    Search,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => f.write_str("OpenAI"),
            Self::Search => f.write_str("SerpAPI"),
        }
    }
}

/// API secret; `Debug` never prints the value
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, trimming surrounding whitespace
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    /// Secret value for request headers
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether a key was entered
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_present() {
            f.write_str("ApiKey(***)")
        } else {
            f.write_str("ApiKey(<empty>)")
        }
    }
}

/// Session credentials, read-only during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Language model key
    pub model_api_key: ApiKey,
    /// Search key
    pub search_api_key: ApiKey,
}

impl Credentials {
    /// Create credentials from raw strings
    #[inline]
    #[must_use]
    pub fn new(model_api_key: impl Into<String>, search_api_key: impl Into<String>) -> Self {
        Self {
            model_api_key: ApiKey::new(model_api_key),
            search_api_key: ApiKey::new(search_api_key),
        }
    }

    /// Presence check, model key first
    ///
    /// # Errors
    /// [`CredentialError::Missing`] for the first blank key.
    pub fn ensure_present(&self) -> Result<(), CredentialError> {
        if !self.model_api_key.is_present() {
            return Err(CredentialError::Missing(CredentialKind::Model));
        }
        if !self.search_api_key.is_present() {
            return Err(CredentialError::Missing(CredentialKind::Search));
        }
        Ok(())
    }
}

/// deskfit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskfitConfig {
    /// Chat model id used by every stage
    pub model: String,
    /// OpenAI-compatible API base URL
    pub openai_base_url: String,
    /// SerpApi base URL
    pub serpapi_base_url: String,
    /// Google country code for product search
    pub search_country: String,
    /// Google interface language for product search
    pub search_language: String,
    /// Upper bound on search queries per run
    pub max_product_queries: usize,
    /// Hits kept per search query
    pub results_per_query: usize,
    /// Report file name written on download
    pub report_file_name: String,
}

impl DeskfitConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; absent keys keep their defaults
    ///
    /// # Errors
    /// [`DeskfitError::Io`] if the file cannot be read, otherwise as
    /// [`DeskfitConfig::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> Result<Self, DeskfitError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`DeskfitError::Config`] for malformed TOML or settings rejected by
    /// [`DeskfitConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, DeskfitError> {
        let config: Self =
            toml::from_str(text).map_err(|e| DeskfitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could succeed with
    ///
    /// # Errors
    /// [`DeskfitError::Config`] naming the offending setting.
    pub fn validate(&self) -> Result<(), DeskfitError> {
        if self.model.trim().is_empty() {
            return Err(DeskfitError::Config("model must not be empty".to_string()));
        }
        if self.results_per_query == 0 {
            return Err(DeskfitError::Config(
                "results_per_query must be at least 1".to_string(),
            ));
        }
        if !self.report_file_name.ends_with(".md") {
            return Err(DeskfitError::Config(format!(
                "report_file_name must end with .md, got '{}'",
                self.report_file_name
            )));
        }
        Ok(())
    }

    /// With model id
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With OpenAI base URL
    #[inline]
    #[must_use]
    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    /// With SerpApi base URL
    #[inline]
    #[must_use]
    pub fn with_serpapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.serpapi_base_url = url.into();
        self
    }

    /// With max product queries
    #[inline]
    #[must_use]
    pub fn with_max_product_queries(mut self, max: usize) -> Self {
        self.max_product_queries = max;
        self
    }

    /// With results kept per query
    #[inline]
    #[must_use]
    pub fn with_results_per_query(mut self, n: usize) -> Self {
        self.results_per_query = n;
        self
    }
}

impl Default for DeskfitConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            search_country: "us".to_string(),
            search_language: "en".to_string(),
            max_product_queries: 4,
            results_per_query: 5,
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(format!("{:?}", ApiKey::default()), "ApiKey(<empty>)");
    }

    #[test]
    fn credentials_presence_check() {
        let missing_model = Credentials::new("  ", "serp");
        assert!(matches!(
            missing_model.ensure_present(),
            Err(CredentialError::Missing(CredentialKind::Model))
        ));

        let missing_search = Credentials::new("sk", "");
        assert!(matches!(
            missing_search.ensure_present(),
            Err(CredentialError::Missing(CredentialKind::Search))
        ));

        assert!(Credentials::new("sk", "serp").ensure_present().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DeskfitConfig::from_toml_str("model = \"gpt-4o-mini\"\nmax_product_queries = 2\n")
            .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_product_queries, 2);
        assert_eq!(config.results_per_query, 5);
        assert_eq!(config.report_file_name, DEFAULT_REPORT_FILE_NAME);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = DeskfitConfig::from_toml_str("results_per_query = 0").unwrap_err();
        assert!(matches!(err, DeskfitError::Config(_)));

        let err = DeskfitConfig::from_toml_str("model = [").unwrap_err();
        assert!(matches!(err, DeskfitError::Config(_)));
    }
}
