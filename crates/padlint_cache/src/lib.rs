//! # padlint_cache
//!
//! In-memory cache of checker results keyed by content fingerprint.
//!
//! Re-checking text that was seen recently (an undo, switching back to an
//! earlier draft) is answered from here instead of the checking service.

mod entry;
mod manager;

pub use entry::CacheEntry;
pub use manager::{DEFAULT_CAPACITY, ResultCache};
