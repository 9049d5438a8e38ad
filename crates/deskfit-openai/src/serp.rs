//! SerpApi Google search backend

use crate::http;
use deskfit_core::{ApiKey, SearchHit, Service, UpstreamError, UpstreamErrorKind, WebSearch};
use serde::Deserialize;

/// SerpApi reports "no results" as an error string on a 200 response
const NO_RESULTS_PREFIX: &str = "Google hasn't returned any results";

/// Google web search through SerpApi
#[derive(Debug, Clone)]
pub struct SerpApiSearch {
    client: reqwest::Client,
    endpoint: String,
    country: String,
    language: String,
}

impl SerpApiSearch {
    /// Create with a fresh HTTP client
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create on top of an existing HTTP client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/search.json", base_url.trim_end_matches('/')),
            country: "us".to_string(),
            language: "en".to_string(),
        }
    }

    /// Google `gl` and `hl` parameters
    #[must_use]
    pub fn with_locale(mut self, country: &str, language: &str) -> Self {
        self.country = country.to_string();
        self.language = language.to_string();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    shopping_results: Vec<ShoppingResult>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShoppingResult {
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    product_link: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Shopping results first (direct product pages), then organic results
fn collect_hits(response: SearchResponse) -> Result<Vec<SearchHit>, UpstreamError> {
    if let Some(error) = response.error {
        if error.starts_with(NO_RESULTS_PREFIX) {
            return Ok(Vec::new());
        }
        return Err(UpstreamError::search(UpstreamErrorKind::Service, error));
    }

    let shopping = response.shopping_results.into_iter().filter_map(|r| {
        let link = r.link.or(r.product_link)?;
        let snippet = [r.price, r.source]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" - ");
        Some(SearchHit {
            title: r.title,
            link,
            snippet,
        })
    });
    let organic = response.organic_results.into_iter().map(|r| SearchHit {
        title: r.title,
        link: r.link,
        snippet: r.snippet.unwrap_or_default(),
    });

    Ok(shopping.chain(organic).collect())
}

#[async_trait::async_trait]
impl WebSearch for SerpApiSearch {
    async fn search(
        &self,
        credential: &ApiKey,
        query: &str,
    ) -> Result<Vec<SearchHit>, UpstreamError> {
        tracing::debug!(query, "serpapi search");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
                ("api_key", credential.expose()),
            ])
            .send()
            .await
            .map_err(|e| http::transport_error(Service::Search, e))?;

        let (status, text) = http::read_body(Service::Search, response).await?;
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<SearchResponse>(&text)
                .ok()
                .and_then(|r| r.error);
            return Err(http::status_error(Service::Search, status, message));
        }

        collect_hits(http::decode(Service::Search, &text)?)
    }
}
