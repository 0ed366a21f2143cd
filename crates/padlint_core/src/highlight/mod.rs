//! Live highlights and how they are painted.

mod registry;
mod render;

pub use registry::{HighlightRegistry, Popup};
pub use render::{AttributeRenderer, Renderer, SegmentRenderer, select_renderer};

use serde::Serialize;

use padlint_client::Issue;
use padlint_text::{LineRange, LineSegment, Span};

/// One issue placed in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRecord {
    /// `error_{index}_{offset}_{length}`; carried by the painted element.
    pub id: String,
    pub issue: Issue,
    /// Display range at render time. The end column is exclusive.
    pub range: LineRange,
    /// Flat-text range the checker reported.
    pub source: Span,
}

impl HighlightRecord {
    /// Creates the record for the `index`-th issue of a result list.
    pub fn new(index: usize, issue: Issue, range: LineRange) -> Self {
        Self {
            id: highlight_id(index, &issue),
            source: issue.span(),
            issue,
            range,
        }
    }

    #[inline]
    pub fn start_line(&self) -> u32 {
        self.range.start.line
    }

    #[inline]
    pub fn start_column(&self) -> u32 {
        self.range.start.column
    }

    #[inline]
    pub fn end_line(&self) -> u32 {
        self.range.end.line
    }

    #[inline]
    pub fn end_column(&self) -> u32 {
        self.range.end.column
    }

    /// Per-line pieces of the range.
    pub fn segments(&self, line_lengths: &[u32]) -> Vec<LineSegment> {
        self.range.segments(line_lengths)
    }
}

/// Builds the identity of the `index`-th issue.
pub fn highlight_id(index: usize, issue: &Issue) -> String {
    format!("error_{}_{}_{}", index, issue.offset, issue.length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use padlint_text::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_fields() {
        let range = LineRange::new(Position::new(1, 2), Position::new(1, 5));
        let record = HighlightRecord::new(3, Issue::new(12, 3, "m"), range);

        assert_eq!(record.id, "error_3_12_3");
        assert_eq!(record.source, Span::new(12, 15));
        assert_eq!(
            (record.start_line(), record.start_column(), record.end_line(), record.end_column()),
            (1, 2, 1, 5)
        );
    }
}
