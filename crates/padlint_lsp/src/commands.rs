//! Workspace commands understood by the server.

use serde::Deserialize;
use serde_json::Value;
use tower_lsp::lsp_types::{ExecuteCommandParams, Url};

/// Forces a check of a document: `[uri]`.
pub const CHECK_COMMAND: &str = "padlint.check";

/// Accepts a suggestion: `[uri, highlightId, replacement]`.
pub const ACCEPT_COMMAND: &str = "padlint.acceptSuggestion";

/// All commands, as advertised in the server capabilities.
pub const COMMANDS: [&str; 2] = [CHECK_COMMAND, ACCEPT_COMMAND];

/// A parsed `workspace/executeCommand` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Check {
        uri: Url,
    },
    Accept {
        uri: Url,
        id: String,
        replacement: String,
    },
}

impl Command {
    /// Parses the command name and positional arguments.
    pub fn parse(params: ExecuteCommandParams) -> Result<Self, String> {
        let mut args = params.arguments.into_iter();

        match params.command.as_str() {
            CHECK_COMMAND => Ok(Self::Check {
                uri: next_arg(&mut args, "uri")?,
            }),
            ACCEPT_COMMAND => Ok(Self::Accept {
                uri: next_arg(&mut args, "uri")?,
                id: next_arg(&mut args, "highlight id")?,
                replacement: next_arg(&mut args, "replacement")?,
            }),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

fn next_arg<T>(args: &mut impl Iterator<Item = Value>, name: &str) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    let value = args
        .next()
        .ok_or_else(|| format!("Missing argument: {}", name))?;
    serde_json::from_value(value).map_err(|e| format!("Invalid argument {}: {}", name, e))
}
