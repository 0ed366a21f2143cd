//! Check command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, info};

use padlint_core::{CheckSession, MemoryDocument, SessionConfig};

use crate::cli::{Cli, OutputFormat};
use crate::fix::{FixSummary, apply_fixes, output_fix_summary};
use crate::output::{FileReport, output_results};
use crate::utils::{create_tokio_runtime, load_config};

pub fn run_check(
    cli: &Cli,
    files: &[PathBuf],
    format: OutputFormat,
    fix: bool,
    dry_run: bool,
    language: Option<&str>,
) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(language) = language {
        config.default_language = language.to_string();
    }

    let client = config.client().into_diagnostic()?;
    let runtime = create_tokio_runtime()?;

    let mut reports = Vec::with_capacity(files.len());
    let mut fixes = FixSummary::default();

    for path in files {
        let mut session = open_session(path, &config, cli.no_cache)?;

        let report = runtime
            .block_on(session.check_now(&client))
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to check {}", path.display()))?;
        debug!("{}: {}", path.display(), report.summary());

        let highlights = session.highlights().records().cloned().collect();

        let remaining = if fix {
            let applied = apply_fixes(&mut session);
            if applied > 0 {
                if !dry_run {
                    std::fs::write(path, session.document().text())
                        .into_diagnostic()
                        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                    info!("Fixed {} issue(s) in {}", applied, path.display());
                }
                fixes.record(path, applied);
            }
            session.highlights().len() + report.dropped.len()
        } else {
            report.issue_count
        };

        reports.push(FileReport {
            path: path.clone(),
            report,
            highlights,
            remaining,
        });
    }

    let has_errors = output_results(&reports, format)?;

    if fix {
        output_fix_summary(&fixes, dry_run);
    }

    Ok(has_errors)
}

fn open_session(
    path: &Path,
    config: &SessionConfig,
    no_cache: bool,
) -> Result<CheckSession<MemoryDocument>> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let document = MemoryDocument::new(path.display().to_string(), &text);
    let mut session = CheckSession::new(config.clone(), document);
    if no_cache {
        session.disable_cache();
    }
    Ok(session)
}

