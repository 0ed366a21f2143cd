//! Cheap content fingerprints for change detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-bit rolling hash of a document's text.
///
/// Computed as `h = h * 31 + unit` over the UTF-16 code units with `i32`
/// wraparound. Equal fingerprints are treated as equal content; collisions
/// are possible and tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(i32);

impl Fingerprint {
    /// Fingerprints `text`.
    pub fn of(text: &str) -> Self {
        let hash = text.encode_utf16().fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        });
        Self(hash)
    }

    /// Wraps a raw hash value.
    #[inline]
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw hash value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
