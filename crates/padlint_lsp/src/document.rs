//! Server-side mirror of an open document.

use indexmap::IndexMap;
use tower_lsp::lsp_types::Url;

use padlint_core::{DocumentError, HighlightSurface, HostDocument, splice_lines, split_lines};
use padlint_text::{LineRange, LineSegment, Position};

/// Full-sync copy of a client document.
///
/// Highlights are kept as ranges and published as diagnostics, so the
/// attribute renderer is always used.
#[derive(Debug, Clone)]
pub struct LspDocument {
    uri: Url,
    lines: Vec<String>,
    version: i32,
    highlights: IndexMap<String, LineRange>,
}

impl LspDocument {
    pub fn new(uri: Url, text: &str, version: i32) -> Self {
        Self {
            uri,
            lines: split_lines(text),
            version,
            highlights: IndexMap::new(),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Applies a full-sync change.
    pub fn update(&mut self, text: &str, version: i32) {
        self.lines = split_lines(text);
        self.version = version;
    }

    /// Painted ranges by highlight id.
    pub fn highlights(&self) -> impl Iterator<Item = (&str, &LineRange)> {
        self.highlights.iter().map(|(id, range)| (id.as_str(), range))
    }
}

impl HostDocument for LspDocument {
    fn identity(&self) -> &str {
        self.uri.as_str()
    }

    fn lines(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.lines.clone())
    }

    fn export_text(&self) -> Result<String, DocumentError> {
        Ok(self.text())
    }

    fn revision(&self) -> Option<u64> {
        u64::try_from(self.version).ok()
    }

    fn replace_range(&mut self, range: LineRange, text: &str) -> Result<(), DocumentError> {
        splice_lines(&mut self.lines, range, text)
    }
}

impl HighlightSurface for LspDocument {
    fn has_attribute_api(&self) -> bool {
        true
    }

    fn apply_attribute(&mut self, id: &str, range: LineRange) -> Result<(), DocumentError> {
        self.highlights.insert(id.to_string(), range);
        Ok(())
    }

    fn splice_segment(&mut self, id: &str, segment: LineSegment) -> Result<(), DocumentError> {
        let start = Position::new(segment.line, segment.start_column);
        let end = Position::new(segment.line, segment.end_column);
        self.highlights
            .entry(id.to_string())
            .and_modify(|range| range.end = end)
            .or_insert(LineRange::new(start, end));
        Ok(())
    }

    fn remove_highlight(&mut self, id: &str) {
        self.highlights.shift_remove(id);
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }
}
