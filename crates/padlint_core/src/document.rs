//! Host document capabilities.
//!
//! A session never talks to an editor directly. It reads and edits text
//! through [`HostDocument`] and paints highlights through
//! [`HighlightSurface`]. [`MemoryDocument`] implements both in memory and
//! backs the CLI and the tests.

use padlint_text::units::utf16_to_byte;
use padlint_text::{LineRange, LineSegment, Position};

use crate::DocumentError;

/// Text access to the document being checked.
pub trait HostDocument {
    /// Token identifying the document; a change means a different document.
    fn identity(&self) -> &str;

    /// Line texts, without newline characters.
    fn lines(&self) -> Result<Vec<String>, DocumentError>;

    /// Structured export of the whole text, when the host offers one.
    fn export_text(&self) -> Result<String, DocumentError> {
        Err(DocumentError::Unsupported)
    }

    /// Last-resort text extraction.
    fn raw_text(&self) -> Result<String, DocumentError> {
        Err(DocumentError::Unsupported)
    }

    /// Monotonically increasing revision counter, when exposed.
    fn revision(&self) -> Option<u64> {
        None
    }

    /// Replaces the text between two caret positions.
    fn replace_range(&mut self, range: LineRange, text: &str) -> Result<(), DocumentError>;
}

/// Where highlights are painted.
pub trait HighlightSurface {
    /// Whether the host supports attaching attributes to ranges.
    fn has_attribute_api(&self) -> bool {
        false
    }

    /// Attaches highlight `id` to a (possibly multi-line) range.
    fn apply_attribute(&mut self, id: &str, range: LineRange) -> Result<(), DocumentError> {
        let _ = (id, range);
        Err(DocumentError::Unsupported)
    }

    /// Wraps part of a single line in highlight `id`.
    fn splice_segment(&mut self, id: &str, segment: LineSegment) -> Result<(), DocumentError>;

    /// Removes every painted piece of highlight `id`.
    fn remove_highlight(&mut self, id: &str);

    /// Removes all highlights.
    fn clear_highlights(&mut self);

    /// Closes the suggestion popup if one is shown.
    fn close_popup(&mut self) {}
}

/// A highlight painted on a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Painted {
    Attribute { id: String, range: LineRange },
    Segment { id: String, segment: LineSegment },
}

impl Painted {
    pub fn id(&self) -> &str {
        match self {
            Self::Attribute { id, .. } | Self::Segment { id, .. } => id,
        }
    }
}

/// In-memory document and highlight surface.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    identity: String,
    lines: Vec<String>,
    revision: Option<u64>,
    structured_export: bool,
    attribute_api: bool,
    painted: Vec<Painted>,
    popup_closes: usize,
}

impl MemoryDocument {
    /// Creates a document from flat text.
    pub fn new(identity: impl Into<String>, text: &str) -> Self {
        Self {
            identity: identity.into(),
            lines: split_lines(text),
            revision: None,
            structured_export: true,
            attribute_api: true,
            painted: Vec::new(),
            popup_closes: 0,
        }
    }

    /// Starts revision tracking at `revision`.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Drops the structured export capability.
    pub fn without_export(mut self) -> Self {
        self.structured_export = false;
        self
    }

    /// Drops the attribute API, forcing per-line segment painting.
    pub fn without_attribute_api(mut self) -> Self {
        self.attribute_api = false;
        self
    }

    /// Full text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the whole text, as a remote collaborator would.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.bump_revision();
    }

    /// Currently painted highlights.
    pub fn painted(&self) -> &[Painted] {
        &self.painted
    }

    /// Number of times a popup close was requested.
    pub fn popup_closes(&self) -> usize {
        self.popup_closes
    }

    fn bump_revision(&mut self) {
        if let Some(revision) = self.revision.as_mut() {
            *revision += 1;
        }
    }
}

/// Splits flat text into line texts.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Replaces `range` of `lines` with `text`, which may contain newlines.
pub fn splice_lines(lines: &mut Vec<String>, range: LineRange, text: &str) -> Result<(), DocumentError> {
    if range.end < range.start {
        return Err(DocumentError::invalid_range("end precedes start"));
    }

    let start = byte_index(lines, range.start)?;
    let end = byte_index(lines, range.end)?;

    let first = range.start.line as usize;
    let last = range.end.line as usize;

    let mut joined = String::with_capacity(text.len() + 16);
    joined.push_str(&lines[first][..start]);
    joined.push_str(text);
    joined.push_str(&lines[last][end..]);

    lines.splice(first..=last, split_lines(&joined));
    Ok(())
}

fn byte_index(lines: &[String], position: Position) -> Result<usize, DocumentError> {
    let line = lines
        .get(position.line as usize)
        .ok_or_else(|| DocumentError::invalid_range(format!("line {} does not exist", position.line)))?;

    utf16_to_byte(line, position.column).ok_or_else(|| {
        DocumentError::invalid_range(format!(
            "column {} is not a boundary on line {}",
            position.column, position.line
        ))
    })
}

impl HostDocument for MemoryDocument {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn lines(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.lines.clone())
    }

    fn export_text(&self) -> Result<String, DocumentError> {
        if self.structured_export {
            Ok(self.text())
        } else {
            Err(DocumentError::Unsupported)
        }
    }

    fn raw_text(&self) -> Result<String, DocumentError> {
        Ok(self.text())
    }

    fn revision(&self) -> Option<u64> {
        self.revision
    }

    fn replace_range(&mut self, range: LineRange, text: &str) -> Result<(), DocumentError> {
        splice_lines(&mut self.lines, range, text)?;
        self.bump_revision();
        Ok(())
    }
}

impl HighlightSurface for MemoryDocument {
    fn has_attribute_api(&self) -> bool {
        self.attribute_api
    }

    fn apply_attribute(&mut self, id: &str, range: LineRange) -> Result<(), DocumentError> {
        if !self.attribute_api {
            return Err(DocumentError::Unsupported);
        }
        self.painted.push(Painted::Attribute {
            id: id.to_string(),
            range,
        });
        Ok(())
    }

    fn splice_segment(&mut self, id: &str, segment: LineSegment) -> Result<(), DocumentError> {
        let line = self
            .lines
            .get(segment.line as usize)
            .ok_or_else(|| DocumentError::invalid_range(format!("line {} does not exist", segment.line)))?;

        if utf16_to_byte(line, segment.end_column).is_none() {
            return Err(DocumentError::invalid_range(format!(
                "segment {}..{} exceeds line {}",
                segment.start_column, segment.end_column, segment.line
            )));
        }

        self.painted.push(Painted::Segment {
            id: id.to_string(),
            segment,
        });
        Ok(())
    }

    fn remove_highlight(&mut self, id: &str) {
        self.painted.retain(|p| p.id() != id);
    }

    fn clear_highlights(&mut self) {
        self.painted.clear();
    }

    fn close_popup(&mut self) {
        self.popup_closes += 1;
    }
}
