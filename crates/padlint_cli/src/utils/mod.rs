//! CLI utility functions

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;
use tracing::info;

use padlint_core::SessionConfig;

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Loads `explicit`, else the nearest config file, else the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<SessionConfig> {
    if let Some(path) = explicit {
        return SessionConfig::from_file(path).into_diagnostic();
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    match SessionConfig::discover(&cwd) {
        Some(path) => {
            info!("Using config {}", path.display());
            SessionConfig::from_file(&path).into_diagnostic()
        }
        None => Ok(SessionConfig::default()),
    }
}
