//! Fix application logic

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use padlint_core::{CheckSession, HighlightSurface, HostDocument};
use padlint_text::Span;

/// Summary of applied fixes.
#[derive(Debug, Default)]
pub struct FixSummary {
    pub total_fixes: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
}

impl FixSummary {
    pub fn record(&mut self, path: &Path, fixes: usize) {
        self.total_fixes += fixes;
        self.fixes_by_file.push((path.to_path_buf(), fixes));
    }
}

/// Accepts the first suggestion of every live highlight.
///
/// Works from the last offset to the first so that the flat offsets of the
/// remaining highlights stay valid. Returns the number of fixes applied.
pub fn apply_fixes<D>(session: &mut CheckSession<D>) -> usize
where
    D: HostDocument + HighlightSurface,
{
    let mut targets: Vec<(Span, String)> = session
        .highlights()
        .records()
        .map(|record| (record.source, record.id.clone()))
        .collect();
    targets.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut applied = 0;
    let mut floor = u32::MAX;
    for (source, id) in targets {
        if source.end > floor {
            warn!("Skipping {}: overlaps a later fix", id);
            continue;
        }
        match session.accept_first(&id) {
            Ok(Some(_)) => {
                applied += 1;
                floor = source.start;
            }
            Ok(None) => debug!("No suggestion for {}", id),
            Err(e) => warn!("Skipping {}: {}", id, e),
        }
    }
    applied
}

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.total_fixes == 0 {
        println!("No fixable issues found.");
        return;
    }

    let action = if dry_run { "Would fix" } else { "Fixed" };
    println!(
        "\n{} {} issues in {} files:",
        action,
        summary.total_fixes,
        summary.fixes_by_file.len()
    );
    for (path, count) in &summary.fixes_by_file {
        println!("  {}: {} fixes", path.display(), count);
    }

    if dry_run {
        println!("\nRun without --dry-run to apply fixes.");
    }
}
