//! Session configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use padlint_client::{ClientError, LanguageToolClient, RuleFilters};

use crate::SessionError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration of a check session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Check endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Language code sent with every check.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Whether edits schedule checks automatically.
    #[serde(default = "default_auto_check")]
    pub auto_check: bool,

    /// Debounce delay in milliseconds.
    #[serde(default = "default_debounce_delay")]
    pub debounce_delay: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum text length sent to the checker, in UTF-16 units.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Number of results kept in the result cache.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Rule and category filters.
    #[serde(flatten)]
    pub filters: RuleFilters,
}

fn default_api_url() -> String {
    padlint_client::DEFAULT_API_URL.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_auto_check() -> bool {
    true
}

fn default_debounce_delay() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    padlint_client::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_max_text_length() -> usize {
    padlint_client::DEFAULT_MAX_TEXT_LENGTH
}

fn default_cache_size() -> usize {
    padlint_cache::DEFAULT_CAPACITY
}

fn schema() -> Result<&'static Validator, SessionError> {
    CONFIG_SCHEMA
        .get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
            Validator::new(&schema_json).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| SessionError::config(format!("Invalid embedded config schema: {}", e)))
}

impl SessionConfig {
    /// Config file names, in lookup order.
    pub const CONFIG_FILES: [&'static str; 2] = [".padlint.jsonc", ".padlint.json"];

    /// Creates a configuration with all defaults.
    pub fn new() -> Self {
        Self {
            api_url: default_api_url(),
            default_language: default_language(),
            auto_check: default_auto_check(),
            debounce_delay: default_debounce_delay(),
            timeout: default_timeout(),
            max_text_length: default_max_text_length(),
            cache_size: default_cache_size(),
            filters: RuleFilters::default(),
        }
    }

    /// Finds the nearest config file in `start` or one of its ancestors.
    pub fn discover(start: impl AsRef<Path>) -> Option<PathBuf> {
        let start = start.as_ref();
        let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

        start.ancestors().find_map(|dir| {
            Self::CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.padlint.jsonc`, `.padlint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| SessionError::config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses configuration from JSON (comments allowed) with schema validation.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| SessionError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        if let Err(e) = schema()?.validate(&value) {
            return Err(SessionError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| SessionError::config(format!("Invalid config: {}", e)))
    }

    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_delay)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Builds an HTTP checker from this configuration.
    pub fn client(&self) -> Result<LanguageToolClient, ClientError> {
        LanguageToolClient::builder()
            .api_url(&self.api_url)
            .timeout(self.request_timeout())
            .max_text_length(self.max_text_length)
            .build()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
