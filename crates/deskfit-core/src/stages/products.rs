//! Product Finder
//!
//! Three steps:
//! 1. A model call turns the fix plan into shopping queries (or `NONE`)
//! 2. One search call per query
//! 3. A model call formats the raw hits into a short linked product list
//!
//! Nothing purchasable yields an empty section, never an error.

use crate::backend::{CompletionRequest, LanguageModel, SearchHit, WebSearch};
use crate::config::Credentials;
use crate::error::UpstreamError;
use crate::prompts;
use crate::records::{FixPlan, ProductSuggestions};
use std::sync::Arc;

/// Looks up purchasable items implied by the fixes
#[derive(Clone)]
pub struct ProductFinder {
    model: Arc<dyn LanguageModel>,
    search: Arc<dyn WebSearch>,
    max_queries: usize,
    results_per_query: usize,
}

impl ProductFinder {
    /// Create new finder
    #[inline]
    #[must_use]
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn WebSearch>,
        max_queries: usize,
        results_per_query: usize,
    ) -> Self {
        Self {
            model,
            search,
            max_queries,
            results_per_query,
        }
    }

    /// Find products for the fix plan
    ///
    /// # Errors
    /// Any model or search failure, verbatim. An empty plan, a `NONE` reply
    /// or searches without hits all return [`ProductSuggestions::none`].
    pub async fn find_products(
        &self,
        fixes: &FixPlan,
        credentials: &Credentials,
    ) -> Result<ProductSuggestions, UpstreamError> {
        if fixes.is_empty() || self.max_queries == 0 {
            return Ok(ProductSuggestions::none());
        }

        let queries = self.derive_queries(fixes, credentials).await?;
        if queries.is_empty() {
            tracing::info!("no purchasable items implied by fixes");
            return Ok(ProductSuggestions::none());
        }

        let mut results: Vec<(String, Vec<SearchHit>)> = Vec::with_capacity(queries.len());
        for query in queries {
            let mut hits = self
                .search
                .search(&credentials.search_api_key, &query)
                .await?;
            hits.truncate(self.results_per_query);
            tracing::debug!(query = %query, hits = hits.len(), "product search");
            if !hits.is_empty() {
                results.push((query, hits));
            }
        }

        if results.is_empty() {
            tracing::info!("product searches returned no results");
            return Ok(ProductSuggestions::none());
        }

        let request = CompletionRequest::text(
            prompts::PRODUCT_INSTRUCTIONS,
            prompts::product_prompt(fixes.as_str(), &results),
        );
        let text = self
            .model
            .complete(&credentials.model_api_key, request)
            .await?;
        let suggestions = ProductSuggestions::new(text);
        tracing::debug!(links = suggestions.links().len(), "product suggestions formatted");
        Ok(suggestions)
    }

    async fn derive_queries(
        &self,
        fixes: &FixPlan,
        credentials: &Credentials,
    ) -> Result<Vec<String>, UpstreamError> {
        let request = CompletionRequest::text(
            prompts::query_instructions(self.max_queries),
            fixes.as_str(),
        );
        let reply = self
            .model
            .complete(&credentials.model_api_key, request)
            .await?;
        Ok(prompts::parse_queries(&reply, self.max_queries))
    }
}

impl std::fmt::Debug for ProductFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductFinder")
            .field("max_queries", &self.max_queries)
            .field("results_per_query", &self.results_per_query)
            .finish_non_exhaustive()
    }
}
