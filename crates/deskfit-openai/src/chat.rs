//! OpenAI chat completions backend

use crate::http;
use deskfit_core::{
    ApiKey, CompletionRequest, LanguageModel, Service, UpstreamError, UpstreamErrorKind,
};
use serde::{Deserialize, Serialize};

/// Chat completions client for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenAiChat {
    /// Create with a fresh HTTP client
    #[must_use]
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, model)
    }

    /// Create on top of an existing HTTP client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str, model: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
        }
    }

    /// Full completions URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Content,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Content {
    Text(String),
    Parts(Vec<Part>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Part {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn build_body<'a>(model: &'a str, request: CompletionRequest) -> ChatBody<'a> {
    let user = match request.image {
        Some(image) => Content::Parts(vec![
            Part::Text {
                text: request.prompt,
            },
            Part::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            },
        ]),
        None => Content::Text(request.prompt),
    };

    ChatBody {
        model,
        messages: vec![
            Message {
                role: "system",
                content: Content::Text(request.instructions),
            },
            Message {
                role: "user",
                content: user,
            },
        ],
    }
}

fn extract_text(response: ChatResponse) -> Result<String, UpstreamError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| {
            UpstreamError::model(UpstreamErrorKind::MalformedResponse, "response had no choices")
        })?;

    match (message.content, message.refusal) {
        (Some(content), _) => Ok(content),
        (None, Some(refusal)) => Err(UpstreamError::model(UpstreamErrorKind::Service, refusal)),
        (None, None) => Err(UpstreamError::model(
            UpstreamErrorKind::MalformedResponse,
            "response message had no content",
        )),
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: CompletionRequest,
    ) -> Result<String, UpstreamError> {
        let has_image = request.image.is_some();
        let body = build_body(&self.model, request);
        tracing::debug!(model = %self.model, has_image, "chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| http::transport_error(Service::Model, e))?;

        let (status, text) = http::read_body(Service::Model, response).await?;
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .map(|envelope| envelope.error.message);
            return Err(http::status_error(Service::Model, status, message));
        }

        extract_text(http::decode(Service::Model, &text)?)
    }
}
