//! Report pipeline orchestration
//!
//! Runs the four stages strictly in sequence:
//! 1. Vision analysis of the photo
//! 2. Risk prioritization
//! 3. Fix synthesis
//! 4. Product search
//!
//! then assembles the report. The first failure ends the run and no partial
//! report is produced. A spawned run can be cancelled between stages.

use crate::backend::{LanguageModel, WebSearch};
use crate::config::{Credentials, DeskfitConfig};
use crate::error::DeskfitError;
use crate::report::{assemble, Report};
use crate::stages::{FixSynthesizer, ProductFinder, RiskPrioritizer, VisionAnalyzer};
use crate::types::{RunId, RunStatus, Stage, WorkspaceInput};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// The four-stage report pipeline
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    analyzer: VisionAnalyzer,
    prioritizer: RiskPrioritizer,
    synthesizer: FixSynthesizer,
    finder: ProductFinder,
}

impl ReportPipeline {
    /// Build the stages on top of the given backends
    #[must_use]
    pub fn new(
        config: &DeskfitConfig,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            analyzer: VisionAnalyzer::new(Arc::clone(&model)),
            prioritizer: RiskPrioritizer::new(Arc::clone(&model)),
            synthesizer: FixSynthesizer::new(Arc::clone(&model)),
            finder: ProductFinder::new(
                model,
                search,
                config.max_product_queries,
                config.results_per_query,
            ),
        }
    }

    /// Run to completion or first failure
    ///
    /// # Errors
    /// Missing credentials before any upstream call, otherwise the first
    /// stage failure.
    pub async fn run(
        &self,
        credentials: &Credentials,
        input: &WorkspaceInput,
    ) -> Result<Report, DeskfitError> {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let (status_tx, _status_rx) = watch::channel(RunStatus::NotStarted);
        let id = RunId::new();
        self.execute(credentials, input, &cancel_rx, &status_tx)
            .instrument(tracing::info_span!("report_run", run_id = %id))
            .await
    }

    /// Run on a background task that can be cancelled between stages
    #[must_use]
    pub fn spawn(&self, credentials: Credentials, input: WorkspaceInput) -> ReportRun {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(RunStatus::NotStarted);
        let id = RunId::new();
        let pipeline = self.clone();

        let task = tokio::spawn(
            async move {
                pipeline
                    .execute(&credentials, &input, &cancel_rx, &status_tx)
                    .await
            }
            .instrument(tracing::info_span!("report_run", run_id = %id)),
        );

        ReportRun {
            id,
            cancel: cancel_tx,
            status: status_rx,
            task,
        }
    }

    async fn execute(
        &self,
        credentials: &Credentials,
        input: &WorkspaceInput,
        cancel: &watch::Receiver<bool>,
        status: &watch::Sender<RunStatus>,
    ) -> Result<Report, DeskfitError> {
        let result = self.execute_stages(credentials, input, cancel, status).await;
        let terminal = match &result {
            Ok(_) => RunStatus::Completed,
            Err(DeskfitError::Cancelled(_)) => RunStatus::Cancelled,
            Err(e) => RunStatus::Failed(e.stage()),
        };
        status.send_replace(terminal);
        result
    }

    async fn execute_stages(
        &self,
        credentials: &Credentials,
        input: &WorkspaceInput,
        cancel: &watch::Receiver<bool>,
        status: &watch::Sender<RunStatus>,
    ) -> Result<Report, DeskfitError> {
        credentials.ensure_present()?;
        tracing::info!(
            focus = %input.focus_area,
            goal = %input.goal,
            "starting workspace report"
        );
        let start = Instant::now();

        enter_stage(Stage::Analyze, cancel, status)?;
        let risks = self
            .analyzer
            .analyze(input, &credentials.model_api_key)
            .await
            .map_err(|e| stage_failed(Stage::Analyze, e))?;
        stage_done(Stage::Analyze, risks.as_str().len(), start);

        enter_stage(Stage::Prioritize, cancel, status)?;
        let prioritized = self
            .prioritizer
            .prioritize(&risks, &credentials.model_api_key)
            .await
            .map_err(|e| stage_failed(Stage::Prioritize, e))?;
        stage_done(Stage::Prioritize, prioritized.as_str().len(), start);

        enter_stage(Stage::Synthesize, cancel, status)?;
        let fixes = self
            .synthesizer
            .synthesize(
                &prioritized,
                input.focus_area,
                &input.goal,
                &credentials.model_api_key,
            )
            .await
            .map_err(|e| stage_failed(Stage::Synthesize, e))?;
        stage_done(Stage::Synthesize, fixes.as_str().len(), start);

        enter_stage(Stage::FindProducts, cancel, status)?;
        let products = self
            .finder
            .find_products(&fixes, credentials)
            .await
            .map_err(|e| stage_failed(Stage::FindProducts, e))?;
        stage_done(Stage::FindProducts, products.as_str().len(), start);

        let report = assemble(&risks, &prioritized, &fixes, &products);
        tracing::info!(
            bytes = report.as_markdown().len(),
            elapsed_ms = elapsed_ms(start),
            "workspace report assembled"
        );
        Ok(report)
    }
}

fn enter_stage(
    stage: Stage,
    cancel: &watch::Receiver<bool>,
    status: &watch::Sender<RunStatus>,
) -> Result<(), DeskfitError> {
    if *cancel.borrow() {
        tracing::info!(%stage, "run cancelled");
        return Err(DeskfitError::Cancelled(stage));
    }
    status.send_replace(RunStatus::Running(stage));
    tracing::info!(stage = %stage, step = stage.ordinal(), "stage started");
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn stage_done(stage: Stage, output_bytes: usize, start: Instant) {
    tracing::info!(
        stage = %stage,
        output_bytes,
        elapsed_ms = elapsed_ms(start),
        "stage finished"
    );
}

fn stage_failed(stage: Stage, source: crate::error::UpstreamError) -> DeskfitError {
    tracing::warn!(%stage, error = %source, "stage failed");
    DeskfitError::from_upstream(stage, source)
}

/// Handle to a spawned report run
#[derive(Debug)]
pub struct ReportRun {
    id: RunId,
    cancel: watch::Sender<bool>,
    status: watch::Receiver<RunStatus>,
    task: JoinHandle<Result<Report, DeskfitError>>,
}

impl ReportRun {
    /// Run identifier (log correlation only)
    #[inline]
    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Ask the run to stop before its next stage
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> RunStatus {
        *self.status.borrow()
    }

    /// Watch status transitions
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> {
        self.status.clone()
    }

    /// Wait for the run to finish
    ///
    /// # Errors
    /// The run's own failure, or [`DeskfitError::Cancelled`] if the task was
    /// aborted.
    ///
    /// # Panics
    /// Re-raises a panic from the run task.
    pub async fn wait(self) -> Result<Report, DeskfitError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => {
                let stage = match *self.status.borrow() {
                    RunStatus::Running(stage) => stage,
                    _ => Stage::Analyze,
                };
                Err(DeskfitError::Cancelled(stage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_ms_counts_whole_milliseconds() {
        let start = Instant::now() - Duration::from_millis(1500);
        let ms = elapsed_ms(start);
        assert!((1500..60_000).contains(&ms), "{ms}");
    }
}
