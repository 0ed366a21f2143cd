//! Initialize and shutdown handlers.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::info;

use crate::commands::COMMANDS;
use crate::config::reload_config;
use crate::state::BackendState;

/// Handles the `initialize` LSP request.
pub async fn handle_initialize(
    state: &BackendState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("padlint LSP server initializing...");

    let root = params.root_uri.and_then(|u| u.to_file_path().ok());
    if let Some(path) = root {
        *state.workspace_root.write() = Some(path);
        reload_config(state);
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                },
            )),
            code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                code_action_kinds: Some(vec![
                    CodeActionKind::QUICKFIX,
                    CodeActionKind::SOURCE_FIX_ALL,
                ]),
                resolve_provider: Some(false),
                work_done_progress_options: Default::default(),
            })),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "padlint-lsp".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(client: &tower_lsp::Client) {
    client
        .log_message(MessageType::INFO, "padlint LSP server initialized!")
        .await;
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown() -> Result<()> {
    info!("padlint LSP server shutting down...");
    Ok(())
}
