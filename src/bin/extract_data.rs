use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;

use fixture_extract::api::HttpApiClient;
use fixture_extract::app::Extractor;
use fixture_extract::cli::{CommonArgs, exit_code, init_tracing};
use fixture_extract::output::{ConsoleOutput, JsonOutput, OutputMode, sink_for};
use fixture_extract::store::DataStore;

#[derive(Parser)]
#[command(name = "extract-data")]
#[command(about = "Snapshot the configured merchants and transactions into fixture files")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return exit_code(&report);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mode = cli.common.output_mode();
    let config = cli.common.resolve()?;

    if matches!(mode, OutputMode::Human) {
        ConsoleOutput::banner("Extracting JSON data from API for static fixtures");
        println!("Base URL: {}", config.base_url);
        println!("Data dir: {}", config.data_dir);
    }

    let client = HttpApiClient::new(&config.base_url)?;
    let extractor = Extractor::new(DataStore::new(config.data_dir.clone()), client);
    let report = extractor.snapshot(
        &config.merchant_ids,
        &config.transaction_ids,
        sink_for(mode),
    )?;

    match mode {
        OutputMode::Human => ConsoleOutput::print_snapshot_summary(&report),
        OutputMode::Json => JsonOutput::print_snapshot(&report).into_diagnostic()?,
    }
    Ok(())
}
