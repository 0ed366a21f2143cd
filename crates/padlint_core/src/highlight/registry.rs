//! The set of highlights currently on screen.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::document::HighlightSurface;
use crate::highlight::{HighlightRecord, Renderer, select_renderer};

/// Content of the suggestion popup for one highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub id: String,
    /// Headline: the message, else the short message, else a generic text.
    pub title: String,
    pub short_message: String,
    pub suggestions: Vec<String>,
}

/// Owns the live highlight generation.
#[derive(Debug)]
pub struct HighlightRegistry {
    records: IndexMap<String, HighlightRecord>,
    renderer: Box<dyn Renderer>,
    popup: Option<String>,
}

impl HighlightRegistry {
    /// Creates an empty registry, choosing the renderer for `surface`.
    pub fn new(surface: &dyn HighlightSurface) -> Self {
        Self::with_renderer(select_renderer(surface))
    }

    pub fn with_renderer(renderer: Box<dyn Renderer>) -> Self {
        Self {
            records: IndexMap::new(),
            renderer,
            popup: None,
        }
    }

    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Replaces the live generation with `records`.
    ///
    /// The previous generation is cleared first. Records the surface
    /// refuses are logged and left out. Returns the number rendered.
    pub fn render(
        &mut self,
        surface: &mut dyn HighlightSurface,
        records: Vec<HighlightRecord>,
        line_lengths: &[u32],
    ) -> usize {
        self.clear(surface);

        for record in records {
            match self.renderer.paint(surface, &record, line_lengths) {
                Ok(()) => {
                    self.records.insert(record.id.clone(), record);
                }
                Err(e) => {
                    warn!("Could not paint {}: {}", record.id, e);
                    surface.remove_highlight(&record.id);
                }
            }
        }

        debug!("Rendered {} highlight(s)", self.records.len());
        self.records.len()
    }

    /// Removes every live record and closes any open popup.
    pub fn clear(&mut self, surface: &mut dyn HighlightSurface) {
        self.close_popup(surface);
        surface.clear_highlights();
        self.records.clear();
    }

    pub fn lookup(&self, id: &str) -> Option<&HighlightRecord> {
        self.records.get(id)
    }

    /// Removes one record and its painting.
    pub fn remove(&mut self, surface: &mut dyn HighlightSurface, id: &str) -> Option<HighlightRecord> {
        let record = self.records.shift_remove(id)?;
        surface.remove_highlight(id);
        if self.popup.as_deref() == Some(id) {
            self.close_popup(surface);
        }
        Some(record)
    }

    /// Opens the suggestion popup for `id`, closing any other one.
    pub fn open_popup(&mut self, surface: &mut dyn HighlightSurface, id: &str) -> Option<Popup> {
        self.close_popup(surface);

        let record = self.records.get(id)?;
        self.popup = Some(id.to_string());

        Some(Popup {
            id: record.id.clone(),
            title: record.issue.headline().to_string(),
            short_message: record.issue.short_message.clone(),
            suggestions: record.issue.replacements.clone(),
        })
    }

    pub fn close_popup(&mut self, surface: &mut dyn HighlightSurface) {
        if self.popup.take().is_some() {
            surface.close_popup();
        }
    }

    /// Id of the highlight whose popup is open.
    pub fn open_popup_id(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    /// Live records in render order.
    pub fn records(&self) -> impl Iterator<Item = &HighlightRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
