//! HTTP backends for deskfit
//!
//! - [`OpenAiChat`]: vision-capable chat completions, implements
//!   [`deskfit_core::LanguageModel`]
//! - [`SerpApiSearch`]: Google results through SerpApi, implements
//!   [`deskfit_core::WebSearch`]
//!
//! Both use the HTTP client's default timeouts and never retry.

#![warn(unreachable_pub)]

mod chat;
mod http;
mod serp;

pub use chat::OpenAiChat;
pub use serp::SerpApiSearch;

use deskfit_core::DeskfitConfig;
use std::sync::Arc;

/// Build both backends from configuration, sharing one connection pool
#[must_use]
pub fn backends(config: &DeskfitConfig) -> (Arc<OpenAiChat>, Arc<SerpApiSearch>) {
    let client = reqwest::Client::new();
    let chat = OpenAiChat::with_client(client.clone(), &config.openai_base_url, &config.model);
    let search = SerpApiSearch::with_client(client, &config.serpapi_base_url)
        .with_locale(&config.search_country, &config.search_language);
    (Arc::new(chat), Arc::new(search))
}
