//! Translation between flat-text offsets and line/column positions.
//!
//! The checker sees the document as one string with lines joined by `\n`.
//! The host edits it as a sequence of lines. [`OffsetMap`] is built once per
//! mapping pass and answers both directions of the question for that exact
//! line structure.

use crate::span::{LineRange, Position, Span};
use crate::units::utf16_len;

/// One slot of the dense offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    /// Line containing this offset.
    pub line: u32,
    /// Column of this offset within the line.
    pub column: u32,
    /// True for the synthetic slot standing for an inter-line newline.
    pub is_newline: bool,
}

impl MapEntry {
    /// Returns the entry's position.
    #[inline]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Dense table mapping every flat-text offset to its line and column.
///
/// Each UTF-16 unit of each line gets a slot, and one synthetic slot is
/// added for the newline between two lines. No slot follows the final
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMap {
    entries: Vec<MapEntry>,
    line_lengths: Vec<u32>,
}

impl OffsetMap {
    /// Builds the table for a line-structured document.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let line_lengths: Vec<u32> = lines.iter().map(|l| utf16_len(l.as_ref())).collect();
        let total: u32 = line_lengths.iter().sum::<u32>() + line_lengths.len().saturating_sub(1) as u32;

        let mut entries = Vec::with_capacity(total as usize);
        let last = line_lengths.len().saturating_sub(1);

        for (idx, &len) in line_lengths.iter().enumerate() {
            let line = idx as u32;
            entries.extend((0..len).map(|column| MapEntry {
                line,
                column,
                is_newline: false,
            }));

            if idx < last {
                entries.push(MapEntry {
                    line,
                    column: len,
                    is_newline: true,
                });
            }
        }

        Self {
            entries,
            line_lengths,
        }
    }

    /// Builds the table for flat text by splitting it on `\n`.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        Self::from_lines(&lines)
    }

    /// Total number of flat-text units, newlines included.
    #[inline]
    pub fn len(&self) -> u32 {
        self.entries.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lines in the mapped document.
    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_lengths.len() as u32
    }

    /// Length of every line in UTF-16 units.
    #[inline]
    pub fn line_lengths(&self) -> &[u32] {
        &self.line_lengths
    }

    /// Looks up the slot for `offset`.
    #[inline]
    pub fn entry(&self, offset: u32) -> Option<MapEntry> {
        self.entries.get(offset as usize).copied()
    }

    /// Converts an offset into a caret position.
    ///
    /// Unlike [`entry`](Self::entry) this accepts `offset == len()`, the
    /// position just after the last unit of the document.
    pub fn position(&self, offset: u32) -> Option<Position> {
        if let Some(entry) = self.entry(offset) {
            return Some(entry.position());
        }

        if offset == self.len() {
            let last_line = self.line_lengths.len().checked_sub(1)?;
            return Some(Position::new(
                last_line as u32,
                self.line_lengths[last_line],
            ));
        }

        None
    }

    /// Converts a position back into a flat-text offset.
    pub fn offset_of(&self, position: Position) -> Option<u32> {
        let line_len = *self.line_lengths.get(position.line as usize)?;
        if position.column > line_len {
            return None;
        }

        let line_start: u32 = self.line_lengths[..position.line as usize]
            .iter()
            .map(|len| len + 1)
            .sum();

        Some(line_start + position.column)
    }

    /// Resolves a highlighted span to a display range.
    ///
    /// The end of the span is looked up inclusively (`end - 1`) and the
    /// resulting column is turned back into an exclusive bound, clamped to
    /// the line length when the last highlighted unit is a newline. Empty
    /// spans resolve to an empty range at their start.
    pub fn resolve(&self, span: Span) -> Option<LineRange> {
        if span.is_empty() {
            let at = self.position(span.start)?;
            return Some(LineRange::new(at, at));
        }

        let start = self.entry(span.start)?;
        let last = self.entry(span.end - 1)?;

        let end_column = if last.is_newline {
            last.column
        } else {
            last.column + 1
        };

        Some(LineRange::new(
            start.position(),
            Position::new(last.line, end_column),
        ))
    }

    /// Resolves a span to the range an editor must replace.
    ///
    /// Both ends are caret positions, so a span ending at the document end
    /// is accepted.
    pub fn edit_range(&self, span: Span) -> Option<LineRange> {
        let start = self.position(span.start)?;
        let end = self.position(span.end)?;
        Some(LineRange::new(start, end))
    }
}
