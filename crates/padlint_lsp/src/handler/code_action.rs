//! Code actions listing suggestions for highlights.

use std::collections::HashMap;

use serde_json::json;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::debug;

use padlint_core::{HighlightRecord, HostDocument};
use padlint_text::OffsetMap;

use crate::commands::ACCEPT_COMMAND;
use crate::conversion::{SOURCE, from_lsp_range, highlight_id, to_lsp_diagnostic, to_lsp_range};
use crate::state::{BackendState, Session};

/// Handles the `textDocument/codeAction` request.
///
/// Quick fixes dispatch [`ACCEPT_COMMAND`] so the session applies the
/// edit; the fix-all action is a plain workspace edit.
pub fn handle_code_action(
    state: &BackendState,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    debug!("Code action request: {}", params.text_document.uri);

    let uri = &params.text_document.uri;
    let sessions = state.sessions.lock();
    let Some(session) = sessions.get(uri) else {
        return Ok(None);
    };

    let (wants_fix_all, wants_quickfix) = match &params.context.only {
        Some(only) => (
            only.contains(&CodeActionKind::SOURCE_FIX_ALL),
            only.contains(&CodeActionKind::QUICKFIX),
        ),
        None => (true, true),
    };

    let mut actions = Vec::new();

    if wants_quickfix {
        add_quickfix_actions(
            session,
            uri,
            params.range,
            &params.context.diagnostics,
            &mut actions,
        );
    }

    if wants_fix_all {
        add_fix_all_action(session, uri, &mut actions);
    }

    Ok(Some(actions))
}

fn add_quickfix_actions(
    session: &Session,
    uri: &Url,
    request_range: Range,
    diagnostics: &[Diagnostic],
    actions: &mut Vec<CodeActionOrCommand>,
) {
    // Diagnostics we published name their highlight; without them fall back
    // to the highlights under the cursor.
    let ids: Vec<&str> = diagnostics
        .iter()
        .filter(|d| d.source.as_deref() == Some(SOURCE))
        .filter_map(highlight_id)
        .collect();

    let records: Vec<&HighlightRecord> = if ids.is_empty() {
        let request_range = from_lsp_range(request_range);
        session
            .highlights()
            .records()
            .filter(|record| record.range.intersects(&request_range))
            .collect()
    } else {
        ids.into_iter().filter_map(|id| session.lookup(id)).collect()
    };

    for record in records {
        for (i, replacement) in record.issue.replacements.iter().enumerate() {
            let title = if replacement.is_empty() {
                "Remove".to_string()
            } else {
                format!("Replace with \"{}\"", replacement)
            };

            let action = CodeAction {
                title: title.clone(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![to_lsp_diagnostic(record)]),
                command: Some(Command {
                    title,
                    command: ACCEPT_COMMAND.to_string(),
                    arguments: Some(vec![json!(uri), json!(record.id), json!(replacement)]),
                }),
                is_preferred: Some(i == 0),
                ..Default::default()
            };
            actions.push(CodeActionOrCommand::CodeAction(action));
        }
    }
}

fn add_fix_all_action(session: &Session, uri: &Url, actions: &mut Vec<CodeActionOrCommand>) {
    // Ranges are resolved against the text as it is now, not at render time.
    let map = match session.document().lines() {
        Ok(lines) => OffsetMap::from_lines(&lines),
        Err(e) => {
            debug!("No fix-all for {}: {}", uri, e);
            return;
        }
    };

    let mut fixable: Vec<&HighlightRecord> = session
        .highlights()
        .records()
        .filter(|record| record.issue.first_replacement().is_some())
        .collect();

    fixable.sort_by(|a, b| b.source.start.cmp(&a.source.start));

    let mut edits = Vec::new();
    let mut floor = u32::MAX;
    for record in fixable {
        // Overlapping edits are rejected by clients; keep the later one.
        if record.source.end > floor {
            continue;
        }
        let Some(range) = map.edit_range(record.source) else {
            debug!("Skipping {}: no longer fits the document", record.id);
            continue;
        };
        if let Some(replacement) = record.issue.first_replacement() {
            edits.push(TextEdit {
                range: to_lsp_range(range),
                new_text: replacement.to_string(),
            });
            floor = record.source.start;
        }
    }

    if edits.is_empty() {
        return;
    }

    let action = CodeAction {
        title: "Fix all padlint issues".to_string(),
        kind: Some(CodeActionKind::SOURCE_FIX_ALL),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), edits)])),
            ..Default::default()
        }),
        ..Default::default()
    };
    actions.push(CodeActionOrCommand::CodeAction(action));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LspDocument;
    use padlint_client::{CheckResponse, Issue};
    use padlint_core::CheckStart;
    use pretty_assertions::assert_eq;

    fn uri() -> Url {
        Url::parse("file:///tmp/notes.txt").unwrap()
    }

    fn state_with(text: &str, issues: Vec<Issue>) -> BackendState {
        let state = BackendState::default();
        let mut session = state.open_session(LspDocument::new(uri(), text, 1));

        let CheckStart::Remote { ticket, .. } = session.request_check().unwrap() else {
            panic!("expected a remote check");
        };
        let _ = session.complete_check(ticket, Ok(CheckResponse::with_matches(issues)));

        state.sessions.lock().insert(uri(), session);
        state
    }

    fn params(range: Range, only: Option<Vec<CodeActionKind>>) -> CodeActionParams {
        CodeActionParams {
            text_document: TextDocumentIdentifier::new(uri()),
            range,
            context: CodeActionContext {
                diagnostics: vec![],
                only,
                trigger_kind: None,
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        }
    }

    fn titles(response: CodeActionResponse) -> Vec<String> {
        response
            .into_iter()
            .map(|action| match action {
                CodeActionOrCommand::CodeAction(a) => a.title,
                CodeActionOrCommand::Command(c) => c.title,
            })
            .collect()
    }

    #[test]
    fn test_quickfixes_under_cursor() {
        let state = state_with(
            "Teh cat sat on teh mat.",
            vec![
                Issue::new(0, 3, "Spelling").with_replacements(["The", "Tea"]),
                Issue::new(15, 3, "Spelling").with_replacements(["the"]),
            ],
        );

        let cursor = Range::new(Position::new(0, 1), Position::new(0, 1));
        let response = handle_code_action(&state, params(cursor, Some(vec![CodeActionKind::QUICKFIX])))
            .unwrap()
            .unwrap();

        assert_eq!(titles(response), vec!["Replace with \"The\"", "Replace with \"Tea\""]);
    }

    #[test]
    fn test_quickfix_dispatches_accept_command() {
        let state = state_with(
            "Teh cat",
            vec![Issue::new(0, 3, "Spelling").with_replacements(["The"])],
        );

        let cursor = Range::new(Position::new(0, 0), Position::new(0, 0));
        let response = handle_code_action(&state, params(cursor, Some(vec![CodeActionKind::QUICKFIX])))
            .unwrap()
            .unwrap();

        let CodeActionOrCommand::CodeAction(action) = &response[0] else {
            panic!("expected a code action");
        };
        let command = action.command.as_ref().unwrap();
        assert_eq!(command.command, ACCEPT_COMMAND);
        assert_eq!(
            command.arguments.as_ref().unwrap(),
            &vec![json!("file:///tmp/notes.txt"), json!("error_0_0_3"), json!("The")]
        );
        assert_eq!(action.is_preferred, Some(true));
    }

    #[test]
    fn test_fix_all_skips_overlaps_and_missing_suggestions() {
        let state = state_with(
            "Teh cat sat on teh mat.",
            vec![
                Issue::new(0, 3, "a").with_replacements(["The"]),
                Issue::new(2, 5, "overlap").with_replacements(["x"]),
                Issue::new(8, 3, "no fix"),
                Issue::new(15, 3, "b").with_replacements(["the"]),
            ],
        );

        let everything = Range::new(Position::new(0, 0), Position::new(0, 23));
        let response = handle_code_action(
            &state,
            params(everything, Some(vec![CodeActionKind::SOURCE_FIX_ALL])),
        )
        .unwrap()
        .unwrap();

        let CodeActionOrCommand::CodeAction(action) = &response[0] else {
            panic!("expected a code action");
        };
        let edits = &action.edit.as_ref().unwrap().changes.as_ref().unwrap()[&uri()];
        let texts: Vec<_> = edits.iter().map(|e| e.new_text.as_str()).collect();
        assert_eq!(texts, vec!["the", "x"]);
    }

    #[test]
    fn test_quickfix_follows_diagnostic_id() {
        let state = state_with(
            "Teh cat sat on teh mat.",
            vec![
                Issue::new(0, 3, "Spelling").with_replacements(["The"]),
                Issue::new(15, 3, "Spelling").with_replacements(["the"]),
            ],
        );
        let diagnostic = to_lsp_diagnostic(state.sessions.lock()[&uri()].lookup("error_1_15_3").unwrap());

        let cursor = Range::new(Position::new(0, 1), Position::new(0, 1));
        let mut request = params(cursor, Some(vec![CodeActionKind::QUICKFIX]));
        request.context.diagnostics = vec![diagnostic];
        let response = handle_code_action(&state, request).unwrap().unwrap();

        assert_eq!(titles(response), vec!["Replace with \"the\""]);
    }

    #[test]
    fn test_fix_all_resolves_ranges_against_current_text() {
        let state = state_with(
            "Teh\ncat sat.",
            vec![
                Issue::new(0, 3, "a").with_replacements(["The"]),
                Issue::new(8, 3, "b").with_replacements(["sits"]),
            ],
        );
        {
            let mut sessions = state.sessions.lock();
            let session = sessions.get_mut(&uri()).unwrap();
            assert_eq!(
                session.lookup("error_1_8_3").unwrap().range,
                padlint_text::LineRange::new(
                    padlint_text::Position::new(1, 4),
                    padlint_text::Position::new(1, 7)
                )
            );
            session.accept("error_0_0_3", "The big\nold").unwrap();
            assert_eq!(session.document().text(), "The big\nold\ncat sat.");
        }

        let everything = Range::new(Position::new(0, 0), Position::new(2, 8));
        let response = handle_code_action(
            &state,
            params(everything, Some(vec![CodeActionKind::SOURCE_FIX_ALL])),
        )
        .unwrap()
        .unwrap();

        let CodeActionOrCommand::CodeAction(action) = &response[0] else {
            panic!("expected a code action");
        };
        let edits = &action.edit.as_ref().unwrap().changes.as_ref().unwrap()[&uri()];
        assert_eq!(
            edits,
            &vec![TextEdit {
                range: Range::new(Position::new(1, 0), Position::new(1, 3)),
                new_text: "sits".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_document() {
        let state = BackendState::default();
        let cursor = Range::new(Position::new(0, 0), Position::new(0, 0));
        assert!(handle_code_action(&state, params(cursor, None)).unwrap().is_none());
    }
}
