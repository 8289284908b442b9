//! CLI argument definitions for the batch mapper.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use snomap_fhir::DEFAULT_CREDENTIALS_FILE;
use snomap_model::SnomedCode;

#[derive(Parser)]
#[command(
    name = "snomap",
    version,
    about = "Map SNOMED CT codes to ICD-10 using a FHIR terminology server",
    long_about = "Map SNOMED CT codes to ICD-10 using a FHIR terminology server.\n\n\
                  Successful mappings are appended to output_codes.csv, failures to\n\
                  failed_codes.csv, and each raw server response is kept under\n\
                  output/json/. Codes already present in either table are skipped\n\
                  unless --full-refresh is given."
)]
#[command(group(ArgGroup::new("input").required(true).args(["code", "batch"])))]
pub struct Cli {
    /// Single SNOMED CT code to map.
    #[arg(long, value_name = "CODE")]
    pub code: Option<SnomedCode>,

    /// File containing SNOMED CT codes, one per line.
    #[arg(long, value_name = "FILE")]
    pub batch: Option<PathBuf>,

    /// Clear both output tables and process every input code.
    #[arg(long = "full-refresh")]
    pub full_refresh: bool,

    /// YAML file with client_id, client_secret, token_endpoint and fhir_endpoint.
    #[arg(
        long,
        value_name = "PATH",
        env = "SNOMAP_CREDENTIALS",
        default_value = DEFAULT_CREDENTIALS_FILE
    )]
    pub credentials: PathBuf,

    /// Directory holding the output tables and the output/json artifacts.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Do not draw a progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Prefix log lines with a timestamp (pretty and compact formats).
    #[arg(long = "log-timestamps")]
    pub log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target")]
    pub log_target: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Include raw server responses in debug logs.
    #[arg(long = "log-payloads")]
    pub log_payloads: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
