//! apidoc-from-source - command-line front end.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [-v] docs [--root DIR] [--entry FILE] [--lib DIR] [-o DIR]
//! apidoc-from-source [-v] splice [--root DIR] [--tools DIR] [--main FILE]
//!     [--module-header FILE] [--target FILE] [--no-splice] [--no-build]
//! ```
//!
//! # Examples
//!
//! Write `data/openapi.json` and `data/openapi.yaml` for the project in the
//! current directory:
//! ```bash
//! apidoc-from-source docs
//! ```
//!
//! Refresh `tools/gen.cpp` without building it:
//! ```bash
//! apidoc-from-source splice --no-build
//! ```

use anyhow::Result;
use apidoc_from_source::cli;
use clap::Parser;
use log::info;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Parse once for the verbose flag, set up logging, then validate
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("apidoc-from-source starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    if cli::run(args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
