//! padlint CLI
//!
//! Grammar checking for plain-text documents, backed by LanguageTool.

mod cli;
mod commands;
mod fix;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_check, run_init, run_lsp};
use utils::load_config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            files,
            format,
            fix,
            dry_run,
            language,
        } => run_check(&cli, files, *format, *fix, *dry_run, language.as_deref()),
        Commands::Init { force } => {
            run_init(*force)?;
            Ok(false)
        }
        Commands::Lsp => {
            run_lsp(load_config(cli.config.as_deref())?)?;
            Ok(false)
        }
    }
}
