//! End-to-end behavior of the report pipeline against scripted backends.

use deskfit_core::{
    download, ApiKey, CompletionRequest, CredentialError, CredentialKind, Credentials,
    DeskfitConfig, DeskfitError, LanguageModel, MissingInputError, PreferenceForm, ReportPipeline,
    RunStatus, Section, Stage, UpstreamError, UpstreamErrorKind,
};
use deskfit_test_utils::{
    hit, monitor_scenario_model, posture_input, test_credentials, ScriptedModel, ScriptedSearch,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn pipeline(model: Arc<ScriptedModel>, search: Arc<ScriptedSearch>) -> ReportPipeline {
    ReportPipeline::new(&DeskfitConfig::new(), model, search)
}

fn riser_search() -> Arc<ScriptedSearch> {
    Arc::new(ScriptedSearch::returning(vec![hit(
        "Monitor Stand",
        "https://shop.example/stand",
    )]))
}

#[tokio::test]
async fn monitor_scenario_produces_four_verbatim_sections() {
    let model = Arc::new(monitor_scenario_model());
    let search = riser_search();

    let report = pipeline(model.clone(), search.clone())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();

    assert_eq!(report.section(Section::DetectedRisks), "Risk: monitor too low");
    assert_eq!(report.section(Section::PrioritizedRisks), "1. Monitor too low (high)");
    assert_eq!(report.section(Section::RecommendedFixes), "Raise monitor to eye level");
    assert_eq!(report.section(Section::ProductSuggestions), "Monitor stand — $25 (link)");

    let md = report.as_markdown();
    let positions: Vec<usize> = Section::ALL
        .iter()
        .map(|s| md.find(s.heading()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let file = download(&report, &DeskfitConfig::new().report_file_name);
    assert_eq!(file.name, "workspace_optimization_report.md");
    assert_eq!(file.content, md);

    assert_eq!(search.queries(), vec!["monitor stand"]);
    assert_eq!(search.keys(), vec![ApiKey::new("serp-test")]);
}

#[tokio::test]
async fn stage_outputs_flow_verbatim_into_next_stage() {
    let model = Arc::new(monitor_scenario_model());
    pipeline(model.clone(), riser_search())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();

    let calls = model.calls();
    assert_eq!(calls.len(), 5);

    // Only the vision call carries the photo
    assert!(calls[0].image.is_some());
    assert!(calls[1..].iter().all(|c| c.image.is_none()));
    assert!(calls[0].instructions.contains("Posture Correction"));
    assert!(calls[0].instructions.contains("reduce back pain"));

    assert_eq!(calls[1].prompt, "Risk: monitor too low");
    assert!(calls[2].prompt.starts_with("1. Monitor too low (high)"));
    assert!(calls[2].prompt.ends_with("Focus: Posture Correction\nGoal: reduce back pain"));
    assert_eq!(calls[3].prompt, "Raise monitor to eye level");
    assert!(calls[4].prompt.contains("https://shop.example/stand"));
}

#[test]
fn missing_image_fails_before_any_upstream_call() {
    // `ReportPipeline::run` only accepts a collected `WorkspaceInput`, so a
    // form without a photo never reaches a backend.
    let err = PreferenceForm::new()
        .with_focus_area(deskfit_core::FocusArea::Posture)
        .with_goal_text("reduce back pain")
        .collect()
        .unwrap_err();

    assert_eq!(err, MissingInputError::Image);
    assert!(matches!(DeskfitError::from(err), DeskfitError::MissingInput(_)));
}

#[tokio::test]
async fn missing_credentials_fail_before_any_upstream_call() {
    let model = Arc::new(monitor_scenario_model());
    let search = riser_search();

    let err = pipeline(model.clone(), search.clone())
        .run(&Credentials::new("sk-test", ""), &posture_input())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeskfitError::Credential(CredentialError::Missing(CredentialKind::Search))
    ));
    assert_eq!(model.call_count(), 0);
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn vision_failure_stops_the_run() {
    let model = Arc::new(ScriptedModel::default());
    model.push_err(UpstreamError::model(
        UpstreamErrorKind::MalformedResponse,
        "unsupported image",
    ));
    model.push_ok("should never be used");
    let search = riser_search();

    let err = pipeline(model.clone(), search.clone())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap_err();

    match &err {
        DeskfitError::Upstream { stage, error } => {
            assert_eq!(*stage, Stage::Analyze);
            assert_eq!(error.message, "unsupported image");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert_eq!(model.call_count(), 1);
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn rejected_model_key_is_a_credential_error() {
    let model = Arc::new(ScriptedModel::default());
    model.push_err(UpstreamError::model(
        UpstreamErrorKind::Authentication,
        "Incorrect API key provided",
    ));

    let err = pipeline(model, riser_search())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeskfitError::Credential(CredentialError::Rejected {
            credential: CredentialKind::Model,
            ..
        })
    ));
}

#[tokio::test]
async fn search_failure_surfaces_from_product_stage() {
    let model = Arc::new(monitor_scenario_model());
    let search = Arc::new(ScriptedSearch::failing(UpstreamError::search(
        UpstreamErrorKind::RateLimited,
        "Your account has run out of searches",
    )));

    let err = pipeline(model.clone(), search)
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::FindProducts));
    assert!(err.to_string().contains("run out of searches"));
    // extraction ran, formatting did not
    assert_eq!(model.call_count(), 4);
}

#[tokio::test]
async fn nothing_purchasable_gives_empty_product_section() {
    let model = Arc::new(ScriptedModel::new([
        "Risk: cluttered desk",
        "1. Clutter (low)",
        "Clear the desk surface",
        "NONE",
    ]));
    let search = riser_search();

    let report = pipeline(model.clone(), search.clone())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();

    assert_eq!(report.section(Section::ProductSuggestions), "");
    assert!(report.as_markdown().contains("### Product Suggestions"));
    assert!(search.queries().is_empty());
    assert_eq!(model.call_count(), 4);
}

#[tokio::test]
async fn searches_without_hits_give_empty_product_section() {
    let model = Arc::new(ScriptedModel::new([
        "Risk: monitor too low",
        "1. Monitor too low (high)",
        "Raise monitor to eye level",
        "monitor stand\nlaptop riser",
    ]));
    let search = Arc::new(ScriptedSearch::empty());

    let report = pipeline(model.clone(), search.clone())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();

    assert_eq!(report.section(Section::ProductSuggestions), "");
    assert_eq!(search.queries(), vec!["monitor stand", "laptop riser"]);
    assert_eq!(model.call_count(), 4);
}

#[tokio::test]
async fn identical_runs_are_byte_identical() {
    let first = pipeline(Arc::new(monitor_scenario_model()), riser_search())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();
    let second = pipeline(Arc::new(monitor_scenario_model()), riser_search())
        .run(&test_credentials(), &posture_input())
        .await
        .unwrap();

    assert_eq!(first.as_markdown().as_bytes(), second.as_markdown().as_bytes());
}

#[tokio::test]
async fn spawned_run_completes_with_status() {
    let run = pipeline(Arc::new(monitor_scenario_model()), riser_search())
        .spawn(test_credentials(), posture_input());
    let status = run.subscribe();

    let report = run.wait().await.unwrap();
    assert_eq!(*status.borrow(), RunStatus::Completed);
    assert_eq!(report.section(Section::RecommendedFixes), "Raise monitor to eye level");
}

/// Holds the first completion until released
struct GatedModel {
    inner: ScriptedModel,
    gate: Notify,
    gated: AtomicBool,
}

#[async_trait::async_trait]
impl LanguageModel for GatedModel {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: CompletionRequest,
    ) -> Result<String, UpstreamError> {
        if !self.gated.swap(true, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.inner.complete(credential, request).await
    }
}

#[tokio::test]
async fn cancel_stops_between_stages() {
    let model = Arc::new(GatedModel {
        inner: monitor_scenario_model(),
        gate: Notify::new(),
        gated: AtomicBool::new(false),
    });
    let pipeline = ReportPipeline::new(&DeskfitConfig::new(), model.clone(), riser_search());

    let run = pipeline.spawn(test_credentials(), posture_input());
    let mut status = run.subscribe();
    status
        .wait_for(|s| *s == RunStatus::Running(Stage::Analyze))
        .await
        .unwrap();

    run.cancel();
    model.gate.notify_one();

    let err = run.wait().await.unwrap_err();
    assert!(matches!(err, DeskfitError::Cancelled(Stage::Prioritize)));
    assert_eq!(*status.borrow(), RunStatus::Cancelled);
    assert_eq!(model.inner.call_count(), 1);
}
