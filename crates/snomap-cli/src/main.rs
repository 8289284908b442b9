//! snomap: SNOMED CT to ICD-10 batch mapper.

use clap::Parser;
use snomap_cli::cli::Cli;
use snomap_cli::commands::run_mapping;
use snomap_cli::logging::{LogConfig, init_logging};
use snomap_cli::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = LogConfig::from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_mapping(&cli) {
        Ok(report) => {
            print_summary(&report);
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
