use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use snomap_core::{BatchEvent, BatchMapper, OutputLayout, read_codes};
use snomap_fhir::{ServerConfig, TerminologyClient};
use snomap_model::{BatchSummary, SnomedCode};

use crate::cli::Cli;

/// Outcome of a completed run, for the summary printout.
#[derive(Debug)]
pub struct RunReport {
    pub summary: BatchSummary,
    pub layout: OutputLayout,
    pub full_refresh: bool,
}

pub fn run_mapping(cli: &Cli) -> Result<RunReport> {
    let span = info_span!("run", output_dir = %cli.output_dir.display());
    let _guard = span.enter();

    // Setup errors abort before any code is requested.
    let codes = collect_codes(cli)?;
    let config = ServerConfig::load(&cli.credentials)
        .with_context(|| format!("load credentials: {}", cli.credentials.display()))?;
    info!(
        codes = codes.len(),
        fhir_endpoint = %config.fhir_endpoint(),
        target_system = config.target_system(),
        "configuration loaded"
    );
    let client = TerminologyClient::new(config).context("create terminology client")?;

    let layout = OutputLayout::new(&cli.output_dir);
    let mapper = BatchMapper::new(&client, layout.clone());
    let progress = progress_bar(codes.len(), !cli.no_progress && io::stderr().is_terminal());

    let result = mapper.run_with_observer(&codes, cli.full_refresh, |event| {
        match event {
            BatchEvent::Skipped { code } => progress.set_message(format!("{code} skipped")),
            BatchEvent::Mapped { code, icd10_code } => {
                progress.set_message(format!("{code} -> {icd10_code}"));
            }
            BatchEvent::Failed { code, .. } => progress.set_message(format!("{code} failed")),
        }
        progress.inc(1);
    });

    match result {
        Ok(summary) => {
            progress.finish_and_clear();
            Ok(RunReport {
                summary,
                layout,
                full_refresh: cli.full_refresh,
            })
        }
        Err(error) => {
            progress.abandon();
            Err(error).context("batch mapping aborted")
        }
    }
}

/// Codes from `--code` or `--batch`, in input order.
pub fn collect_codes(cli: &Cli) -> Result<Vec<SnomedCode>> {
    match (&cli.code, &cli.batch) {
        (Some(code), _) => Ok(vec![code.clone()]),
        (None, Some(path)) => {
            read_codes(path).with_context(|| format!("read batch file: {}", path.display()))
        }
        (None, None) => anyhow::bail!("either --code or --batch is required"),
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:32.cyan/blue}] {pos}/{len} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress
}
