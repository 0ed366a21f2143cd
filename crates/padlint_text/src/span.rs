//! Span and position types for document locations.
//!
//! Flat-text offsets and columns are counted in UTF-16 code units, the unit
//! used by the checking service and by browser and LSP hosts.

use serde::{Deserialize, Serialize};

/// A position in a line-structured document.
///
/// Both line and column are 0-indexed, matching editor conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line index (0-indexed).
    pub line: u32,
    /// Column within the line in UTF-16 units (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A range of flat-text offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: u32,
    /// End offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span from an offset/length pair as reported by a checker.
    ///
    /// Saturates instead of overflowing for absurd lengths.
    #[inline]
    pub const fn from_offset_len(offset: u32, length: u32) -> Self {
        Self {
            start: offset,
            end: offset.saturating_add(length),
        }
    }

    /// Returns the length of the span in UTF-16 units.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A line/column range. The end position is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineRange {
    /// Start position.
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl LineRange {
    /// Creates a new range.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns true if the range starts and ends on the same line.
    #[inline]
    pub const fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Returns true if the two ranges touch or overlap.
    pub fn intersects(&self, other: &LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Splits the range into one segment per line.
    ///
    /// The first line runs from the start column to the end of the line,
    /// interior lines are covered entirely and the last line runs from
    /// column 0 to the end column. Lines missing from `line_lengths` are
    /// skipped.
    pub fn segments(&self, line_lengths: &[u32]) -> Vec<LineSegment> {
        let mut segments = Vec::new();

        for line in self.start.line..=self.end.line {
            let Some(&line_len) = line_lengths.get(line as usize) else {
                break;
            };

            let start_column = if line == self.start.line {
                self.start.column.min(line_len)
            } else {
                0
            };
            let end_column = if line == self.end.line {
                self.end.column.min(line_len)
            } else {
                line_len
            };

            segments.push(LineSegment {
                line,
                start_column,
                end_column: end_column.max(start_column),
            });
        }

        segments
    }
}

/// The part of a highlight that falls on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    /// Line index.
    pub line: u32,
    /// First highlighted column.
    pub start_column: u32,
    /// Column after the last highlighted unit.
    pub end_column: u32,
}

impl LineSegment {
    #[inline]
    pub const fn new(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            line,
            start_column,
            end_column,
        }
    }

    /// Returns true if the segment covers no text.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start_column == self.end_column
    }
}
