//! Maps checker issues onto document coordinates.

use serde::Serialize;
use tracing::warn;

use padlint_client::Issue;
use padlint_text::OffsetMap;

use crate::ErrorKind;
use crate::highlight::HighlightRecord;

/// An issue that could not be placed in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedIssue {
    /// Position of the issue in the checker's result list.
    pub index: usize,
    pub issue: Issue,
    pub kind: ErrorKind,
}

/// Result of one mapping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    /// Mapped records, in checker order.
    pub records: Vec<HighlightRecord>,
    /// Issues whose offsets fall outside the document.
    pub dropped: Vec<DroppedIssue>,
}

/// Maps `issues` onto a document made of `lines`.
///
/// The offset table is built once per call. Issues reaching past the end
/// of the table are dropped and reported, never clamped.
pub fn map_issues<S: AsRef<str>>(issues: &[Issue], lines: &[S]) -> MappingReport {
    map_with(&OffsetMap::from_lines(lines), issues)
}

/// Maps `issues` through a prebuilt offset table.
pub fn map_with(map: &OffsetMap, issues: &[Issue]) -> MappingReport {
    let mut report = MappingReport::default();

    for (index, issue) in issues.iter().enumerate() {
        match map.resolve(issue.span()) {
            Some(range) => report
                .records
                .push(HighlightRecord::new(index, issue.clone(), range)),
            None => {
                warn!(
                    "Dropping issue {} at {}+{}: outside document of {} units",
                    index,
                    issue.offset,
                    issue.length,
                    map.len()
                );
                report.dropped.push(DroppedIssue {
                    index,
                    issue: issue.clone(),
                    kind: ErrorKind::MappingIncomplete,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use padlint_text::{LineRange, Position, Span};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> LineRange {
        LineRange::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_teh_cat_sat() {
        let issues = vec![Issue::new(0, 3, "Spelling").with_replacements(["The"])];
        let report = map_issues(&issues, &["Teh cat sat."]);

        assert!(report.dropped.is_empty());
        assert_eq!(report.records.len(), 1);

        let record = &report.records[0];
        assert_eq!(record.id, "error_0_0_3");
        assert_eq!(record.range, range(0, 0, 0, 3));
        assert_eq!(record.source, Span::new(0, 3));
    }

    #[test]
    fn test_second_line_offsets() {
        // "cat" on line 1 starts after "Teh\n"
        let issues = vec![Issue::new(4, 3, "m")];
        let report = map_issues(&issues, &["Teh", "cat sat."]);
        assert_eq!(report.records[0].range, range(1, 0, 1, 3));
    }

    #[test]
    fn test_multi_line_issue() {
        let issues = vec![Issue::new(6, 8, "m")];
        let lines = ["first line", "second"];
        let report = map_issues(&issues, &lines);

        let record = &report.records[0];
        assert_eq!(record.range, range(0, 6, 1, 3));

        let segments = record.segments(&[10, 6]);
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].start_column, segments[0].end_column), (6, 10));
        assert_eq!((segments[1].start_column, segments[1].end_column), (0, 3));
    }

    #[test]
    fn test_interior_lines_are_covered_whole() {
        let issues = vec![Issue::new(1, 7, "m")];
        let report = map_issues(&issues, &["ab", "cd", "ef"]);

        let segments = report.records[0].segments(&[2, 2, 2]);
        let spans: Vec<_> = segments
            .iter()
            .map(|s| (s.line, s.start_column, s.end_column))
            .collect();
        assert_eq!(spans, vec![(0, 1, 2), (1, 0, 2), (2, 0, 2)]);
    }

    #[test]
    fn test_issue_ending_on_newline() {
        let issues = vec![Issue::new(2, 2, "m")];
        let report = map_issues(&issues, &["abc", "def"]);
        assert_eq!(report.records[0].range, range(0, 2, 0, 3));
    }

    #[test]
    fn test_out_of_bounds_is_dropped() {
        let issues = vec![
            Issue::new(0, 2, "kept"),
            Issue::new(3, 10, "too long"),
            Issue::new(40, 1, "past end"),
        ];
        let report = map_issues(&issues, &["short"]);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, "error_0_0_2");

        let dropped: Vec<_> = report.dropped.iter().map(|d| d.index).collect();
        assert_eq!(dropped, vec![1, 2]);
        assert!(report.dropped.iter().all(|d| d.kind == ErrorKind::MappingIncomplete));
    }

    #[test]
    fn test_ids_keep_checker_index_after_drops() {
        let issues = vec![Issue::new(99, 1, "gone"), Issue::new(1, 1, "kept")];
        let report = map_issues(&issues, &["abc"]);
        assert_eq!(report.records[0].id, "error_1_1_1");
    }

    #[test]
    fn test_zero_length_issue() {
        let issues = vec![Issue::new(3, 0, "insert here")];
        let report = map_issues(&issues, &["abc"]);
        assert_eq!(report.records[0].range, range(0, 3, 0, 3));
    }

    #[test]
    fn test_empty_issue_list() {
        let report = map_issues::<&str>(&[], &["abc"]);
        assert_eq!(report, MappingReport::default());
    }

    fn arb_issue() -> impl Strategy<Value = Issue> {
        (0u32..80, 0u32..20).prop_map(|(offset, length)| Issue::new(offset, length, "m"))
    }

    proptest! {
        #[test]
        fn records_stay_within_document(
            lines in prop::collection::vec("[a-z é🎉]{0,15}", 1..6),
            issues in prop::collection::vec(arb_issue(), 0..12),
        ) {
            let report = map_issues(&issues, &lines);
            let map = OffsetMap::from_lines(&lines);
            let lengths = map.line_lengths();

            prop_assert_eq!(report.records.len() + report.dropped.len(), issues.len());

            for record in &report.records {
                let r = record.range;
                prop_assert!(r.start <= r.end);
                prop_assert!((r.end.line as usize) < lengths.len());
                prop_assert!(r.start.column <= lengths[r.start.line as usize]);
                prop_assert!(r.end.column <= lengths[r.end.line as usize]);
            }
        }

        #[test]
        fn mapping_is_idempotent(
            lines in prop::collection::vec("[a-z ]{0,12}", 1..5),
            issues in prop::collection::vec(arb_issue(), 0..10),
        ) {
            prop_assert_eq!(map_issues(&issues, &lines), map_issues(&issues, &lines));
        }
    }
}
