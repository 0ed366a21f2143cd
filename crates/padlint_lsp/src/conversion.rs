//! LSP type conversion utilities.
//!
//! Columns are UTF-16 units on both sides, so positions convert one to one.

use serde_json::json;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use padlint_client::Issue;
use padlint_core::HighlightRecord;
use padlint_text::{LineRange, Position as LinePosition};

/// Diagnostic source name.
pub const SOURCE: &str = "padlint";

pub fn to_lsp_position(position: LinePosition) -> Position {
    Position::new(position.line, position.column)
}

pub fn to_lsp_range(range: LineRange) -> Range {
    Range::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

pub fn from_lsp_range(range: Range) -> LineRange {
    LineRange::new(
        LinePosition::new(range.start.line, range.start.character),
        LinePosition::new(range.end.line, range.end.character),
    )
}

/// Converts a live highlight to an LSP diagnostic.
///
/// The highlight id travels in `data`.
pub fn to_lsp_diagnostic(record: &HighlightRecord) -> Diagnostic {
    let issue = &record.issue;

    Diagnostic {
        range: to_lsp_range(record.range),
        severity: Some(severity(issue)),
        code: issue
            .rule
            .as_ref()
            .map(|rule| NumberOrString::String(rule.id.clone())),
        source: Some(SOURCE.to_string()),
        message: issue.headline().to_string(),
        data: Some(json!({ "id": record.id })),
        ..Default::default()
    }
}

/// Highlight id carried by a diagnostic this server published.
pub fn highlight_id(diagnostic: &Diagnostic) -> Option<&str> {
    diagnostic.data.as_ref()?.get("id")?.as_str()
}

fn severity(issue: &Issue) -> DiagnosticSeverity {
    let category = issue
        .rule
        .as_ref()
        .and_then(|rule| rule.category.as_ref())
        .map(|category| category.id.as_str());

    match category {
        Some("TYPOS") => DiagnosticSeverity::ERROR,
        Some("STYLE" | "REDUNDANCY" | "TYPOGRAPHY") => DiagnosticSeverity::INFORMATION,
        _ => DiagnosticSeverity::WARNING,
    }
}
