//! # padlint_text
//!
//! Text primitives shared by the padlint crates:
//! - line/column coordinates and flat-text spans
//! - UTF-16 unit helpers
//! - content fingerprints
//! - the dense offset map used to place checker results in a document

mod fingerprint;
mod offset_map;
mod span;
pub mod units;

pub use fingerprint::Fingerprint;
pub use offset_map::{MapEntry, OffsetMap};
pub use span::{LineRange, LineSegment, Position, Span};
