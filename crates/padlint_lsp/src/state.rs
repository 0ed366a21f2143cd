//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tower_lsp::lsp_types::Url;
use tracing::{error, info};

use padlint_client::LanguageToolClient;
use padlint_core::{CheckSession, SessionConfig};

use crate::document::LspDocument;

/// Check session of one open document.
pub(crate) type Session = CheckSession<LspDocument>;

/// Shared backend state.
pub(crate) struct BackendState {
    /// One session per open document.
    pub sessions: Mutex<HashMap<Url, Session>>,
    /// Configuration used for new sessions.
    pub config: RwLock<SessionConfig>,
    /// Checker client (None if the configuration could not build one).
    pub checker: RwLock<Option<LanguageToolClient>>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("sessions", &self.sessions.lock().len())
            .field("config", &*self.config.read())
            .field("workspace_root", &*self.workspace_root.read())
            .finish()
    }
}

impl BackendState {
    /// Creates a state for `config`.
    pub fn new(config: SessionConfig) -> Self {
        let state = Self {
            sessions: Mutex::new(HashMap::new()),
            config: RwLock::new(SessionConfig::default()),
            checker: RwLock::new(None),
            workspace_root: RwLock::new(None),
        };
        state.apply_config(config);
        state
    }

    /// Replaces the configuration and rebuilds the checker.
    ///
    /// Open sessions keep their settings until the document is reopened.
    pub fn apply_config(&self, config: SessionConfig) {
        match config.client() {
            Ok(client) => {
                info!("Using checker at {}", client.api_url());
                *self.checker.write() = Some(client);
            }
            Err(e) => {
                error!("Failed to create checker client: {}. Checks will fail.", e);
                *self.checker.write() = None;
            }
        }
        *self.config.write() = config;
    }

    /// Creates a session for a newly opened document.
    pub fn open_session(&self, document: LspDocument) -> Session {
        CheckSession::new(self.config.read().clone(), document)
    }

    pub fn checker(&self) -> Option<LanguageToolClient> {
        self.checker.read().clone()
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
