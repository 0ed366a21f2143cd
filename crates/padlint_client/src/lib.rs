//! # padlint_client
//!
//! Client for LanguageTool-compatible grammar checking services.
//!
//! The [`Checker`] trait is the seam the check session talks to;
//! [`LanguageToolClient`] is its HTTP implementation.

mod api;
mod client;
mod error;
mod issue;

pub use api::{CheckRequest, CheckResponse, RuleFilters};
pub use client::{
    Checker, DEFAULT_API_URL, DEFAULT_MAX_TEXT_LENGTH, DEFAULT_TIMEOUT, LanguageToolClient,
    LanguageToolClientBuilder,
};
pub use error::{ClientError, ErrorCode};
pub use issue::{Issue, IssueRule, RuleCategory};
