//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// padlint - Grammar checking backed by LanguageTool
#[derive(Parser)]
#[command(name = "padlint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable the result cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check files
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Accept the first suggestion of every issue
        #[arg(long)]
        fix: bool,

        /// Preview fixes without writing them
        #[arg(long, requires = "fix")]
        dry_run: bool,

        /// Language code (overrides the configured default)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Start the LSP server
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dry_run_requires_fix() {
        assert!(Cli::try_parse_from(["padlint", "check", "a.txt", "--dry-run"]).is_err());
        assert!(Cli::try_parse_from(["padlint", "check", "a.txt", "--fix", "--dry-run"]).is_ok());
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::try_parse_from([
            "padlint", "--no-cache", "check", "a.txt", "b.txt", "-f", "json", "-l", "de-DE",
        ])
        .unwrap();

        assert!(cli.no_cache);
        let Commands::Check {
            files,
            format,
            language,
            ..
        } = cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(language.as_deref(), Some("de-DE"));
    }
}
