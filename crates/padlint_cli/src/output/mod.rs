//! Output formatting module

mod json;
mod text;

use std::path::PathBuf;

use miette::Result;
use serde::Serialize;

use padlint_core::{CheckReport, HighlightRecord};

use crate::cli::OutputFormat;

/// Result of checking one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub report: CheckReport,
    /// Highlights as found, before any fixes.
    pub highlights: Vec<HighlightRecord>,
    /// Issues left after fixing.
    pub remaining: usize,
}

/// Prints the reports; returns whether any issue remains.
pub fn output_results(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = reports.iter().any(|r| r.remaining > 0);

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_errors)
}
