//! padlint LSP Server
//!
//! Language Server Protocol host for padlint check sessions.
//! Highlights are published as diagnostics and suggestions are offered as
//! code actions.

mod commands;
mod config;
mod conversion;
mod debounce;
mod document;
mod handler;
mod state;

use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info, warn};

use padlint_client::{CheckRequest, Checker, ClientError};
use padlint_core::{CheckReport, CheckStart, CheckTicket, SessionConfig, SessionError, TimerToken};

use crate::commands::Command;
use crate::state::{BackendState, SharedState};

pub use commands::{ACCEPT_COMMAND, CHECK_COMMAND};
pub use document::LspDocument;

/// The LSP backend for padlint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the default configuration.
    ///
    /// The workspace configuration is loaded during `initialize`.
    pub fn new(client: Client) -> Self {
        Self::with_config(client, SessionConfig::default())
    }

    /// Creates a new backend with `config`.
    pub fn with_config(client: Client, config: SessionConfig) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new(config)),
        }
    }

    /// Diagnostics currently published for `uri`.
    pub fn diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        self.state
            .sessions
            .lock()
            .get(uri)
            .map(|session| {
                session
                    .highlights()
                    .records()
                    .map(conversion::to_lsp_diagnostic)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Server-side text of `uri`.
    pub fn document_text(&self, uri: &Url) -> Option<String> {
        self.state
            .sessions
            .lock()
            .get(uri)
            .map(|session| session.document().text())
    }

    /// Handles a fired debounce timer.
    pub(crate) async fn on_timer_fired(&self, uri: Url, token: TimerToken) {
        let start = {
            let mut sessions = self.state.sessions.lock();
            match sessions.get_mut(&uri) {
                Some(session) => session.on_timer_fired(token),
                None => return,
            }
        };

        if let Err(e) = self.drive(&uri, start).await {
            // Automatic checks fail silently.
            debug!("Automatic check of {} ended: {}", uri, e);
        }
    }

    /// Runs a manual check and reports the result to the user.
    async fn force_check(&self, uri: Url) -> Option<Value> {
        let start = {
            let mut sessions = self.state.sessions.lock();
            match sessions.get_mut(&uri) {
                Some(session) => session.request_check(),
                None => {
                    warn!("Check requested for unknown document {}", uri);
                    return None;
                }
            }
        };

        match self.drive(&uri, start).await {
            Ok(Some(report)) => {
                self.client
                    .show_message(MessageType::INFO, report.summary())
                    .await;
                serde_json::to_value(&report).ok()
            }
            Ok(None) => None,
            Err(SessionError::AlreadyInProgress) => {
                self.client
                    .show_message(MessageType::WARNING, "A check is already in progress")
                    .await;
                None
            }
            Err(e) => {
                self.client.show_message(MessageType::ERROR, e.to_string()).await;
                None
            }
        }
    }

    /// Takes a started check to completion and publishes the highlights.
    async fn drive(
        &self,
        uri: &Url,
        start: std::result::Result<CheckStart, SessionError>,
    ) -> std::result::Result<Option<CheckReport>, SessionError> {
        let (ticket, request) = match start? {
            CheckStart::Skipped(reason) => {
                debug!("Check of {} skipped: {:?}", uri, reason);
                return Ok(None);
            }
            CheckStart::Cached(report) => {
                self.publish(uri).await;
                return Ok(Some(report));
            }
            CheckStart::Remote { ticket, request } => (ticket, request),
        };

        // Highlights were cleared when the check started.
        self.publish(uri).await;

        // The ticket must be completed even if this request is cancelled.
        let task = tokio::spawn({
            let backend = self.clone();
            let uri = uri.clone();
            async move { backend.finish_check(uri, ticket, request).await }
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Check task for {} failed: {}", uri, e);
                Ok(None)
            }
        }
    }

    /// Sends a started check to the checker and commits the answer.
    async fn finish_check(
        &self,
        uri: Url,
        ticket: CheckTicket,
        request: CheckRequest,
    ) -> std::result::Result<Option<CheckReport>, SessionError> {
        let result = match self.state.checker() {
            Some(checker) => checker.check(request).await,
            None => Err(ClientError::ClientBuild(
                "no checker configured".to_string(),
            )),
        };

        let outcome = {
            let mut sessions = self.state.sessions.lock();
            match sessions.get_mut(&uri) {
                Some(session) => session.complete_check(ticket, result),
                None => return Ok(None),
            }
        };

        if let Some(timer) = outcome.timer {
            debounce::spawn_debounced_check(self.clone(), uri.clone(), timer);
        }

        self.publish(&uri).await;
        outcome.into_result()
    }

    /// Applies a suggestion locally and asks the client to do the same.
    async fn accept(&self, uri: Url, id: String, replacement: String) {
        let result = {
            let mut sessions = self.state.sessions.lock();
            match sessions.get_mut(&uri) {
                Some(session) => session.accept(&id, &replacement),
                None => Err(SessionError::UnknownHighlight(id.clone())),
            }
        };

        let range = match result {
            Ok(range) => range,
            Err(e) => {
                warn!("Could not accept {}: {}", id, e);
                self.client.show_message(MessageType::WARNING, e.to_string()).await;
                self.publish(&uri).await;
                return;
            }
        };

        let edit = WorkspaceEdit {
            changes: Some(
                [(
                    uri.clone(),
                    vec![TextEdit {
                        range: conversion::to_lsp_range(range),
                        new_text: replacement,
                    }],
                )]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        };

        match self.client.apply_edit(edit).await {
            Ok(response) if !response.applied => {
                warn!("Client refused edit for {}: {:?}", id, response.failure_reason);
            }
            Ok(_) => {}
            Err(e) => error!("Failed to apply edit for {}: {}", id, e),
        }

        self.publish(&uri).await;
    }

    /// Publishes the live highlights of `uri` as diagnostics.
    async fn publish(&self, uri: &Url) {
        let (diagnostics, version) = {
            let sessions = self.state.sessions.lock();
            match sessions.get(uri) {
                Some(session) => (
                    session
                        .highlights()
                        .records()
                        .map(conversion::to_lsp_diagnostic)
                        .collect(),
                    Some(session.document().version()),
                ),
                None => (Vec::new(), None),
            }
        };

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, timer) = handler::handle_did_open(&self.state, params);
        if let Some(timer) = timer {
            debounce::spawn_debounced_check(self.clone(), uri, timer);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some((uri, timer)) = handler::handle_did_change(&self.state, params) {
            debounce::spawn_debounced_check(self.clone(), uri, timer);
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handler::handle_did_change_watched_files(&self.state, params);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params);
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handler::handle_code_action(&self.state, params)
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        debug!("Execute command: {}", params.command);

        match Command::parse(params) {
            Ok(Command::Check { uri }) => Ok(self.force_check(uri).await),
            Ok(Command::Accept {
                uri,
                id,
                replacement,
            }) => {
                self.accept(uri, id, replacement).await;
                Ok(None)
            }
            Err(message) => Err(tower_lsp::jsonrpc::Error::invalid_params(message)),
        }
    }
}

/// Starts the LSP server with the default configuration.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    run_with_config(SessionConfig::default()).await;
}

/// Starts the LSP server with `config`.
pub async fn run_with_config(config: SessionConfig) {
    info!("padlint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(move |client| Backend::with_config(client, config));
    Server::new(stdin, stdout, socket).serve(service).await;
}
