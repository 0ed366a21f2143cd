//! Issue types reported by the checking service.

use serde::{Deserialize, Deserializer, Serialize};

use padlint_text::Span;

/// One grammar or style problem found by the checker.
///
/// Offsets and lengths are flat-text UTF-16 units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Start offset in the checked text.
    #[serde(default)]
    pub offset: u32,

    /// Length of the flagged text.
    #[serde(default)]
    pub length: u32,

    /// Full explanation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    /// Short explanation, often empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_message: String,

    /// Candidate replacements, best first.
    #[serde(default, deserialize_with = "replacement_values")]
    pub replacements: Vec<String>,

    /// The rule that produced the issue, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<IssueRule>,
}

/// Rule metadata attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RuleCategory>,
}

/// Category of a rule (e.g. `TYPOS`, `GRAMMAR`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCategory {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Issue {
    /// Creates a new issue without replacements.
    pub fn new(offset: u32, length: u32, message: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Sets the short message.
    pub fn with_short_message(mut self, short_message: impl Into<String>) -> Self {
        self.short_message = short_message.into();
        self
    }

    /// Sets the replacement candidates.
    pub fn with_replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the flagged range.
    #[inline]
    pub fn span(&self) -> Span {
        Span::from_offset_len(self.offset, self.length)
    }

    /// Returns the text to headline this issue with.
    pub fn headline(&self) -> &str {
        if !self.message.is_empty() {
            &self.message
        } else if !self.short_message.is_empty() {
            &self.short_message
        } else {
            "Error detected"
        }
    }

    /// Returns the first replacement candidate unless it is empty.
    pub fn first_replacement(&self) -> Option<&str> {
        self.replacements
            .first()
            .map(String::as_str)
            .filter(|candidate| !candidate.is_empty())
    }
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Replacement candidates come as `{ "value": "..." }` objects from
/// LanguageTool and as bare strings from simpler services.
fn replacement_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replacement {
        Plain(String),
        Value { value: String },
    }

    let raw: Option<Vec<Replacement>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|r| match r {
            Replacement::Plain(value) | Replacement::Value { value } => value,
        })
        .collect())
}
