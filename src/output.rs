use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, SnapshotReport, SyncReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

/// Prints progress lines to stdout as they happen.
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn banner(title: &str) {
        println!("{}", "=".repeat(60));
        println!("{title}");
        println!("{}", "=".repeat(60));
    }

    pub fn print_snapshot_summary(report: &SnapshotReport) {
        println!();
        Self::banner("Extraction complete!");
        println!(
            "Saved: {}, Failed: {} (under {})",
            report.artifacts.succeeded, report.artifacts.failed, report.data_dir
        );
    }

    pub fn print_sync_summary(report: &SyncReport) {
        println!();
        if report.missing == 0 {
            return;
        }
        Self::banner("Extraction complete!");
        println!(
            "Success: {}, Failed: {}",
            report.transactions.succeeded, report.transactions.failed
        );
        if report.why_failed > 0 {
            println!("Missing why explanations: {}", report.why_failed);
        }
    }
}

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => println!("{} ({:.1}s)", event.message, elapsed.as_secs_f64()),
            None => println!("{}", event.message),
        }
    }
}

/// Stays quiet while running and prints the final report as JSON.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_snapshot(report: &SnapshotReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_sync(report: &SyncReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub fn sink_for(mode: OutputMode) -> &'static dyn ProgressSink {
    match mode {
        OutputMode::Human => &ConsoleOutput,
        OutputMode::Json => &JsonOutput,
    }
}
