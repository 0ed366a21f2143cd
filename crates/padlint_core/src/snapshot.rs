//! Flat-text snapshots of a host document.

use tracing::{debug, warn};

use padlint_text::Fingerprint;

use crate::document::HostDocument;

/// How the snapshot text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// The host's structured export.
    Export,
    /// Line texts joined with `\n`.
    Lines,
    /// The raw text fallback.
    Raw,
    /// Every strategy failed.
    Unavailable,
}

/// Text of a document at one moment, with its change fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    pub text: String,
    pub fingerprint: Fingerprint,
    pub revision: Option<u64>,
    pub source: SnapshotSource,
}

impl TextSnapshot {
    /// Returns true when there is nothing worth checking.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Takes a snapshot, degrading through the extraction strategies.
pub fn snapshot<D: HostDocument + ?Sized>(document: &D) -> TextSnapshot {
    let (text, source) = match extract(document) {
        Some(found) => found,
        None => {
            warn!(
                "Could not extract text from '{}' using any method",
                document.identity()
            );
            (String::new(), SnapshotSource::Unavailable)
        }
    };

    TextSnapshot {
        fingerprint: Fingerprint::of(&text),
        revision: document.revision(),
        text,
        source,
    }
}

fn extract<D: HostDocument + ?Sized>(document: &D) -> Option<(String, SnapshotSource)> {
    match document.export_text() {
        Ok(text) => return Some((text, SnapshotSource::Export)),
        Err(e) => debug!("Structured export unavailable: {}", e),
    }

    match document.lines() {
        Ok(lines) => return Some((lines.join("\n"), SnapshotSource::Lines)),
        Err(e) => debug!("Line export unavailable: {}", e),
    }

    document
        .raw_text()
        .inspect_err(|e| debug!("Raw text unavailable: {}", e))
        .ok()
        .map(|text| (text, SnapshotSource::Raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentError;
    use crate::document::MemoryDocument;
    use padlint_text::LineRange;
    use pretty_assertions::assert_eq;

    /// A host that offers only what it is told to.
    struct PartialHost {
        lines: Option<Vec<String>>,
        raw: Option<String>,
    }

    impl HostDocument for PartialHost {
        fn identity(&self) -> &str {
            "partial"
        }

        fn lines(&self) -> Result<Vec<String>, DocumentError> {
            self.lines.clone().ok_or(DocumentError::Unsupported)
        }

        fn raw_text(&self) -> Result<String, DocumentError> {
            self.raw.clone().ok_or(DocumentError::Unsupported)
        }

        fn replace_range(&mut self, _: LineRange, _: &str) -> Result<(), DocumentError> {
            Err(DocumentError::Unsupported)
        }
    }

    #[test]
    fn test_structured_export_wins() {
        let doc = MemoryDocument::new("pad", "Teh cat sat.").with_revision(4);
        let snap = snapshot(&doc);

        assert_eq!(snap.text, "Teh cat sat.");
        assert_eq!(snap.source, SnapshotSource::Export);
        assert_eq!(snap.fingerprint, Fingerprint::of("Teh cat sat."));
        assert_eq!(snap.revision, Some(4));
    }

    #[test]
    fn test_falls_back_to_lines() {
        let doc = MemoryDocument::new("pad", "a\nb").without_export();
        let snap = snapshot(&doc);

        assert_eq!(snap.text, "a\nb");
        assert_eq!(snap.source, SnapshotSource::Lines);
        assert_eq!(snap.revision, None);
    }

    #[test]
    fn test_falls_back_to_raw() {
        let host = PartialHost {
            lines: None,
            raw: Some("raw text".to_string()),
        };
        let snap = snapshot(&host);
        assert_eq!(snap.text, "raw text");
        assert_eq!(snap.source, SnapshotSource::Raw);
    }

    #[test]
    fn test_all_strategies_fail() {
        let host = PartialHost {
            lines: None,
            raw: None,
        };
        let snap = snapshot(&host);
        assert_eq!(snap.text, "");
        assert_eq!(snap.source, SnapshotSource::Unavailable);
        assert_eq!(snap.fingerprint.to_string(), "0");
        assert!(snap.is_blank());
    }

    #[test]
    fn test_whitespace_is_blank() {
        let doc = MemoryDocument::new("pad", " \n\t");
        assert!(snapshot(&doc).is_blank());
    }
}
