//! Selection and replacement message handlers

use super::{persist, status, sync_surface};
use crate::adapter::{SurfaceEdit, SurfaceSelection};
use crate::commands::{Cmd, ContextAction};
use crate::coordinator::{DropReason, FlushOutcome};
use crate::messages::{AssistantMsg, ReplacementMsg, SelectionMsg};
use crate::model::AppModel;

/// Handle selection events from the editing surfaces
pub fn update_selection(model: &mut AppModel, msg: SelectionMsg) -> Option<Cmd> {
    match msg {
        SelectionMsg::Surface {
            space,
            anchor,
            head,
        } => match model.on_surface_selection(space, SurfaceSelection::new(anchor, head)) {
            Ok(outcome) => outcome
                .discarded
                .map(|_| status(model, "Pending edit cancelled")),
            Err(e) => {
                tracing::warn!(?space, anchor, head, "rejected selection event: {}", e);
                None
            }
        },
        SelectionMsg::Clear => {
            model.clear_selection();
            None
        }
    }
}

/// Handle replacement requests, flushes and context actions
pub fn update_replacement(model: &mut AppModel, msg: ReplacementMsg) -> Option<Cmd> {
    match msg {
        ReplacementMsg::Request { text, selection } => {
            match model.request_replacement(text, selection) {
                Ok(()) => Some(Cmd::FlushReplacement),
                Err(e) => {
                    tracing::warn!("replacement rejected: {}", e);
                    Some(status(model, e.to_string()))
                }
            }
        }

        ReplacementMsg::Flush => flush(model),

        ReplacementMsg::Discard => {
            model.discard_replacement();
            None
        }

        ReplacementMsg::ContextAction(action) => context_action(model, action),
    }
}

fn flush(model: &mut AppModel) -> Option<Cmd> {
    match model.flush_replacement() {
        Ok(FlushOutcome::Idle) => None,
        Ok(FlushOutcome::Applied {
            switched_mode,
            edit,
            ..
        }) => {
            model.status = None;
            let surface = match edit {
                SurfaceEdit::Text { select } => Cmd::SyncTextSurface {
                    content: model.active_content().to_string(),
                    select: Some(select),
                },
                // A freshly built structured view already shows the result
                SurfaceEdit::Structured { .. } if switched_mode => sync_surface(model),
                SurfaceEdit::Structured { commands } => Cmd::ReplayStructuredEdit { commands },
            };
            Some(Cmd::batch(vec![surface, persist(model)]))
        }
        Ok(FlushOutcome::Dropped { reason, .. }) => {
            let message = match reason {
                DropReason::DocumentMissing => "Edit dropped: the document was deleted",
                DropReason::DocumentInactive => "Edit dropped: another document is open",
                DropReason::StaleSelection | DropReason::OutOfBounds => {
                    "Edit dropped: the selected text has changed"
                }
            };
            // The coordinator may have switched modes before finding the range stale
            Some(Cmd::batch(vec![sync_surface(model), status(model, message)]))
        }
        Err(e) => {
            tracing::error!("replacement failed: {}", e);
            Some(status(model, e.to_string()))
        }
    }
}

fn context_action(model: &mut AppModel, action: ContextAction) -> Option<Cmd> {
    let Some(selection) = model.selection.clone() else {
        tracing::debug!(?action, "context action without a selection");
        return None;
    };
    if !action.available_in(model.mode()) {
        tracing::debug!(?action, mode = ?model.mode(), "context action not offered in this mode");
        return None;
    }

    let mut cmds = Vec::new();
    if action.copies() {
        cmds.push(Cmd::CopyToClipboard(selection.text().to_string()));
    }

    if let ContextAction::Assist(preset) = action {
        let submit = AssistantMsg::Submit {
            input: preset.prompt().to_string(),
        };
        if let Some(cmd) = super::update_assistant(model, submit) {
            cmds.push(cmd);
        }
    } else if let Some(text) = action.replacement_for(&selection) {
        if let Some(cmd) = update_replacement(model, ReplacementMsg::Request { text, selection }) {
            cmds.push(cmd);
        }
    }

    Some(Cmd::batch(cmds))
}
