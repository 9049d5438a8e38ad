use clap::{Parser, ValueEnum};
use deskfit_core::FocusArea;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "deskfit",
    version,
    about = "Ergonomic report from a photo of your workspace"
)]
pub(crate) struct Cli {
    #[arg(long, help = "Workspace photo (jpg, jpeg or png)")]
    pub(crate) image: Option<PathBuf>,

    #[arg(
        long,
        help = "What to focus on: posture, organization or full-assessment"
    )]
    pub(crate) focus: Option<FocusArea>,

    #[arg(
        long,
        help = "Improvement goal: reduce-strain, boost-productivity, calmer-space, space-efficiency, or free text"
    )]
    pub(crate) goal: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub(crate) openai_api_key: Option<String>,

    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    pub(crate) serp_api_key: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub(crate) config: Option<PathBuf>,

    #[arg(long, help = "Override the chat model id")]
    pub(crate) model: Option<String>,

    #[arg(long, default_value = ".", help = "Directory the report file is written to")]
    pub(crate) out_dir: PathBuf,

    #[arg(long, help = "Also write an HTML rendering next to the Markdown file")]
    pub(crate) html: bool,

    #[arg(long, short, help = "Do not print the report to stdout")]
    pub(crate) quiet: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub(crate) log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}
