//! Painting strategies.

use std::fmt;

use tracing::debug;

use crate::DocumentError;
use crate::document::HighlightSurface;
use crate::highlight::HighlightRecord;

/// Paints one record onto a surface.
pub trait Renderer: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn paint(
        &self,
        surface: &mut dyn HighlightSurface,
        record: &HighlightRecord,
        line_lengths: &[u32],
    ) -> Result<(), DocumentError>;
}

/// Attaches the whole range as one attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeRenderer;

impl Renderer for AttributeRenderer {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn paint(
        &self,
        surface: &mut dyn HighlightSurface,
        record: &HighlightRecord,
        _line_lengths: &[u32],
    ) -> Result<(), DocumentError> {
        surface.apply_attribute(&record.id, record.range)
    }
}

/// Splices the range line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentRenderer;

impl Renderer for SegmentRenderer {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn paint(
        &self,
        surface: &mut dyn HighlightSurface,
        record: &HighlightRecord,
        line_lengths: &[u32],
    ) -> Result<(), DocumentError> {
        let segments = record.segments(line_lengths);
        if segments.is_empty() {
            return Err(DocumentError::invalid_range(format!(
                "{} starts past the last line",
                record.id
            )));
        }

        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            surface.splice_segment(&record.id, segment)?;
        }
        Ok(())
    }
}

/// Picks the renderer for a surface. Called once per registry.
pub fn select_renderer(surface: &dyn HighlightSurface) -> Box<dyn Renderer> {
    let renderer: Box<dyn Renderer> = if surface.has_attribute_api() {
        Box::new(AttributeRenderer)
    } else {
        Box::new(SegmentRenderer)
    };
    debug!("Using {} renderer", renderer.name());
    renderer
}
