//! Request and response bodies of the checking service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::issue::{Issue, null_as_default};

/// Rule and category filters forwarded to the checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_categories: Vec<String>,
}

/// Body of a check request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    /// Text to check.
    pub text: String,
    /// Language code, e.g. `en` or `de-DE`.
    pub language: String,
    /// Optional rule filters; empty lists are omitted from the body.
    #[serde(flatten)]
    pub filters: RuleFilters,
}

impl CheckRequest {
    /// Creates a request without rule filters.
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            filters: RuleFilters::default(),
        }
    }

    /// Sets the rule filters.
    pub fn with_filters(mut self, filters: RuleFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Normalized check response.
///
/// All four fields default to empty when the service omits them or sends
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Issues in the order reported by the checker.
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<Issue>,

    /// Detected/used language.
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: Map<String, Value>,

    /// Server software information.
    #[serde(default, deserialize_with = "null_as_default")]
    pub software: Map<String, Value>,

    /// Server warnings such as `incompleteResults`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Map<String, Value>,
}

impl CheckResponse {
    /// Creates a response carrying only issues.
    pub fn with_matches(matches: Vec<Issue>) -> Self {
        Self {
            matches,
            ..Default::default()
        }
    }

    /// Returns true when the server flagged the result as incomplete.
    pub fn is_incomplete(&self) -> bool {
        self.warnings
            .get("incompleteResults")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
