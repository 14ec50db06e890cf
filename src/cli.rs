use std::process::ExitCode;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigLoader, ConfigOverrides, ResolvedConfig};
use crate::error::ExtractError;
use crate::output::OutputMode;

/// Flags shared by both extractors. All of them are optional.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// JSON config file (defaults to ./fixtures.json when present)
    #[arg(long)]
    pub config: Option<String>,

    /// API root, e.g. http://localhost:8000/api
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output data directory
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Print the run report as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    pub fn resolve(&self) -> Result<ResolvedConfig, ExtractError> {
        ConfigLoader::resolve(
            self.config.as_deref(),
            ConfigOverrides {
                base_url: self.base_url.clone(),
                data_dir: self.data_dir.clone(),
            },
        )
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Fetch failures never reach here; only setup errors do.
pub fn exit_code(report: &miette::Report) -> ExitCode {
    match report.downcast_ref::<ExtractError>() {
        Some(err) if err.is_config() => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
