//! Applies accepted suggestions to the document.

use tracing::{info, warn};

use padlint_text::{LineRange, OffsetMap};

use crate::SessionError;
use crate::document::{HighlightSurface, HostDocument};
use crate::highlight::{HighlightRecord, HighlightRegistry};

/// Replaces the text `record` flags with `replacement`.
///
/// The range is recomputed from the record's flat-text offsets against the
/// document as it is now, not taken from render time. Nothing is edited
/// when it no longer fits. On success the record leaves the registry;
/// other records keep their (possibly shifted) ranges until the next check.
pub fn apply<D>(
    document: &mut D,
    registry: &mut HighlightRegistry,
    record: &HighlightRecord,
    replacement: &str,
) -> Result<LineRange, SessionError>
where
    D: HostDocument + HighlightSurface,
{
    let lines = document.lines()?;
    let map = OffsetMap::from_lines(&lines);

    let Some(range) = map.edit_range(record.source) else {
        warn!(
            "{} ({}..{}) no longer fits a document of {} units",
            record.id,
            record.source.start,
            record.source.end,
            map.len()
        );
        return Err(SessionError::StaleRange(record.id.clone()));
    };

    document.replace_range(range, replacement)?;
    registry.remove(document, &record.id);

    info!("Accepted suggestion for {}: {:?}", record.id, replacement);
    Ok(range)
}
