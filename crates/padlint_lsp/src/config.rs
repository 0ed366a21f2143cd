//! Configuration management for LSP server.

use tracing::{error, info};

use padlint_core::SessionConfig;

use crate::state::BackendState;

/// Reloads configuration from the workspace root.
///
/// Keeps the current configuration when no file is found or it is invalid.
pub fn reload_config(state: &BackendState) {
    let Some(root) = state.workspace_root.read().clone() else {
        return;
    };

    let Some(config_path) = SessionConfig::discover(&root) else {
        return;
    };

    info!("Found config file: {}", config_path.display());
    match SessionConfig::from_file(&config_path) {
        Ok(config) => {
            info!("Loaded configuration from workspace");
            state.apply_config(config);
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
        }
    }
}
