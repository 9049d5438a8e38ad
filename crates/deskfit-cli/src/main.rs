//! deskfit command line: collect the form, run the pipeline, save the report

use anyhow::Context;
use clap::Parser;
use deskfit_core::{
    delivery, Credentials, DeskfitConfig, DeskfitError, PreferenceForm, ReportPipeline, RunStatus,
    WorkspaceImage,
};
use std::process::ExitCode;

mod cli;
mod logging;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    let credentials = Credentials::new(
        cli.openai_api_key.clone().unwrap_or_default(),
        cli.serp_api_key.clone().unwrap_or_default(),
    );
    credentials.ensure_present().map_err(DeskfitError::from)?;

    let mut form = PreferenceForm::new();
    if let Some(path) = &cli.image {
        let image = WorkspaceImage::from_path(path)
            .with_context(|| format!("reading workspace photo {}", path.display()))?;
        form = form.with_image(image);
    }
    if let Some(focus) = cli.focus {
        form = form.with_focus_area(focus);
    }
    if let Some(goal) = &cli.goal {
        form = form.with_goal_text(goal);
    }
    let input = form.collect().map_err(DeskfitError::from)?;

    let (model, search) = deskfit_openai::backends(&config);
    let pipeline = ReportPipeline::new(&config, model, search);

    eprintln!("Analyzing your workspace and preparing your ergonomic report...");
    let run = pipeline.spawn(credentials, input);
    tracing::debug!(run_id = %run.id(), "run spawned");

    let mut status = run.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancelled = false;

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                match current {
                    RunStatus::Running(stage) => eprintln!("[{}/4] {stage}...", stage.ordinal()),
                    s if s.is_terminal() => break,
                    _ => {}
                }
            }
            _ = &mut ctrl_c, if !cancelled => {
                eprintln!("Cancelling after the current stage...");
                run.cancel();
                cancelled = true;
            }
        }
    }

    let report = run.wait().await?;

    if !cli.quiet {
        delivery::render(&report, &mut std::io::stdout().lock())?;
    }

    let file = delivery::download(&report, &config.report_file_name);
    let path = file
        .write_to(&cli.out_dir)
        .with_context(|| format!("writing report to {}", cli.out_dir.display()))?;
    eprintln!("Report saved to {}", path.display());

    if cli.html {
        let html_path = path.with_extension("html");
        std::fs::write(&html_path, delivery::to_html(&report))
            .with_context(|| format!("writing {}", html_path.display()))?;
        eprintln!("HTML saved to {}", html_path.display());
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<DeskfitConfig> {
    let mut config = match &cli.config {
        Some(path) => DeskfitConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeskfitConfig::default(),
    };
    if let Some(model) = &cli.model {
        config = config.with_model(model.as_str());
    }
    config.validate()?;
    Ok(config)
}
