use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;

use fixture_extract::api::HttpApiClient;
use fixture_extract::app::Extractor;
use fixture_extract::cli::{CommonArgs, exit_code, init_tracing};
use fixture_extract::output::{ConsoleOutput, JsonOutput, OutputMode, sink_for};
use fixture_extract::store::DataStore;

#[derive(Parser)]
#[command(name = "extract-transactions")]
#[command(about = "Fetch every transaction referenced by saved fixtures but not yet stored")]
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
        ConsoleOutput::banner("Extracting all transaction details");
    }

    let client = HttpApiClient::new(&config.base_url)?;
    let extractor = Extractor::new(DataStore::new(config.data_dir), client);
    let report = extractor.sync_transactions(sink_for(mode))?;

    match mode {
        OutputMode::Human => ConsoleOutput::print_sync_summary(&report),
        OutputMode::Json => JsonOutput::print_sync(&report).into_diagnostic()?,
    }
    Ok(())
}
