//! Cache entry types.

use std::time::SystemTime;

use padlint_client::Issue;
use padlint_text::Fingerprint;

/// Issues cached for one piece of content.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Fingerprint of the checked text.
    pub fingerprint: Fingerprint,

    /// Issues returned by the checker, in checker order.
    pub issues: Vec<Issue>,

    /// When this entry was inserted.
    pub inserted_at: SystemTime,
}

impl CacheEntry {
    /// Creates a new cache entry stamped with the current time.
    pub fn new(fingerprint: Fingerprint, issues: Vec<Issue>) -> Self {
        Self {
            fingerprint,
            issues,
            inserted_at: SystemTime::now(),
        }
    }
}
