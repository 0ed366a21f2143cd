//! Document lifecycle handlers (open, change, close).

use tower_lsp::lsp_types::*;
use tracing::debug;

use padlint_core::TimerRequest;

use crate::document::LspDocument;
use crate::state::BackendState;

/// Handles the `textDocument/didOpen` notification.
///
/// Returns the debounce timer to start for the first check.
pub fn handle_did_open(
    state: &BackendState,
    params: DidOpenTextDocumentParams,
) -> (Url, Option<TimerRequest>) {
    let item = params.text_document;
    debug!("Document opened: {}", item.uri);

    let document = LspDocument::new(item.uri.clone(), &item.text, item.version);
    let mut session = state.open_session(document);
    let timer = session.on_edit();

    let mut sessions = state.sessions.lock();
    if let Some(mut previous) = sessions.insert(item.uri.clone(), session) {
        previous.reset();
    }

    (item.uri, timer)
}

/// Handles the `textDocument/didChange` notification.
///
/// Only full-text changes are expected; the last one wins.
pub fn handle_did_change(
    state: &BackendState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, TimerRequest)> {
    debug!("Document changed: {}", params.text_document.uri);

    let change = params.content_changes.into_iter().last()?;
    let uri = params.text_document.uri;
    let version = params.text_document.version;

    let mut sessions = state.sessions.lock();
    let session = sessions.entry(uri.clone()).or_insert_with(|| {
        state.open_session(LspDocument::new(uri.clone(), "", version))
    });

    session.document_mut().update(&change.text, version);
    let timer = session.on_edit()?;
    Some((uri, timer))
}

/// Handles the `textDocument/didClose` notification.
pub fn handle_did_close(state: &BackendState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    if let Some(mut session) = state.sessions.lock().remove(&params.text_document.uri) {
        session.reset();
    }

    params.text_document.uri
}
