//! Testing utilities for the deskfit workspace
//!
//! Scripted backends that record every call, plus input fixtures.

#![allow(missing_docs)]

use deskfit_core::{
    ApiKey, CompletionRequest, Credentials, FocusArea, LanguageModel, PreferenceForm, SearchHit,
    UpstreamError, UpstreamErrorKind, WebSearch, WorkspaceImage, WorkspaceInput,
};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Language model that replays queued responses in call order
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::default();
        for response in responses {
            model.push_ok(response);
        }
        model
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.responses.lock().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, err: UpstreamError) {
        self.responses.lock().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        _credential: &ApiKey,
        request: CompletionRequest,
    ) -> Result<String, UpstreamError> {
        self.calls.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(UpstreamError::model(
                UpstreamErrorKind::Service,
                "no scripted response left",
            ))
        })
    }
}

/// Search service returning the same hits for every query, or failing
#[derive(Debug, Default)]
pub struct ScriptedSearch {
    hits: Vec<SearchHit>,
    failure: Option<UpstreamError>,
    queries: Mutex<Vec<String>>,
    keys: Mutex<Vec<ApiKey>>,
}

impl ScriptedSearch {
    pub fn returning(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn keys(&self) -> Vec<ApiKey> {
        self.keys.lock().clone()
    }
}

#[async_trait::async_trait]
impl WebSearch for ScriptedSearch {
    async fn search(
        &self,
        credential: &ApiKey,
        query: &str,
    ) -> Result<Vec<SearchHit>, UpstreamError> {
        self.queries.lock().push(query.to_string());
        self.keys.lock().push(credential.clone());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.hits.clone()),
        }
    }
}

pub fn hit(title: &str, link: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        link: link.to_string(),
        snippet: String::new(),
    }
}

/// Tiny JPEG header standing in for `desk_photo.jpg`
pub fn desk_photo() -> WorkspaceImage {
    WorkspaceImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], Some("desk_photo.jpg"))
}

/// posture / "reduce back pain"
pub fn posture_input() -> WorkspaceInput {
    PreferenceForm::new()
        .with_image(desk_photo())
        .with_focus_area(FocusArea::Posture)
        .with_goal_text("reduce back pain")
        .collect()
        .unwrap()
}

pub fn test_credentials() -> Credentials {
    Credentials::new("sk-test", "serp-test")
}

/// Model script for the monitor-too-low scenario, including the product
/// query extraction call
pub fn monitor_scenario_model() -> ScriptedModel {
    ScriptedModel::new([
        "Risk: monitor too low",
        "1. Monitor too low (high)",
        "Raise monitor to eye level",
        "monitor stand",
        "Monitor stand — $25 (link)",
    ])
}
