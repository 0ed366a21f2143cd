//! # padlint_core
//!
//! Check session engine for padlint.
//!
//! This crate provides:
//! - Debounced, single-flight check scheduling
//! - Text snapshots and content fingerprints
//! - Mapping of checker offsets onto document lines
//! - The highlight registry, popups and suggestion application
//! - Configuration loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use padlint_core::{CheckSession, MemoryDocument, SessionConfig};
//!
//! let config = match SessionConfig::discover(".") {
//!     Some(path) => SessionConfig::from_file(path)?,
//!     None => SessionConfig::default(),
//! };
//! let client = config.client()?;
//! let mut session = CheckSession::new(config, MemoryDocument::new("notes", "Teh cat sat."));
//!
//! let report = session.check_now(&client).await?;
//! println!("{}", report.summary());
//! session.accept("error_0_0_3", "The")?;
//! ```

pub mod applicator;
mod config;
pub mod document;
mod error;
pub mod highlight;
pub mod mapper;
pub mod scheduler;
mod session;
pub mod snapshot;

pub use config::SessionConfig;
pub use document::{HighlightSurface, HostDocument, MemoryDocument, Painted, splice_lines, split_lines};
pub use error::{DocumentError, ErrorKind, SessionError};
pub use highlight::{HighlightRecord, HighlightRegistry, Popup};
pub use mapper::{DroppedIssue, MappingReport, map_issues};
pub use scheduler::{Scheduler, SchedulerState, TimerDecision, TimerRequest, TimerToken};
pub use session::{
    CheckOutcome, CheckReport, CheckSession, CheckStart, CheckStatus, CheckTicket, DiscardReason,
    ResultSource, SkipReason,
};
pub use snapshot::{SnapshotSource, TextSnapshot, snapshot};

#[cfg(test)]
pub mod test_utils;

pub use padlint_client::{Checker, ClientError, Issue};
pub use padlint_text::{Fingerprint, LineRange, Position};
