//! Text output formatter

use padlint_core::HighlightRecord;

use super::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for file in reports {
        if file.highlights.is_empty() && file.report.dropped.is_empty() {
            continue;
        }

        println!("\n{}:", file.path.display());
        for record in &file.highlights {
            println!("  {}", format_record(record));
        }
        for dropped in &file.report.dropped {
            println!(
                "  {}..{} (outside the document): {}",
                dropped.issue.offset,
                dropped.issue.offset + dropped.issue.length,
                dropped.issue.headline()
            );
        }
    }

    let total_files = reports.len();
    let total_issues: usize = reports.iter().map(|r| r.report.issue_count).sum();
    let cached = reports
        .iter()
        .filter(|r| r.report.source == padlint_core::ResultSource::Cache)
        .count();

    println!();
    println!(
        "Checked {} files ({} from cache), found {} issues",
        total_files, cached, total_issues
    );
}

/// `line:column [rule]: message (suggestions)`, 1-based.
fn format_record(record: &HighlightRecord) -> String {
    let mut line = format!("{}:{}", record.start_line() + 1, record.start_column() + 1);

    if let Some(rule) = &record.issue.rule {
        line.push_str(&format!(" [{}]", rule.id));
    }
    line.push_str(": ");
    line.push_str(record.issue.headline());

    if !record.issue.replacements.is_empty() {
        let suggestions: Vec<_> = record.issue.replacements.iter().take(5).map(String::as_str).collect();
        line.push_str(&format!(" (suggestions: {})", suggestions.join(", ")));
    }
    line
}
