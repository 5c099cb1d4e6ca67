//! Assistant message handlers

use super::status;
use crate::assistant::Resolution;
use crate::commands::Cmd;
use crate::error::CoreError;
use crate::messages::AssistantMsg;
use crate::model::AppModel;

pub fn update_assistant(model: &mut AppModel, msg: AssistantMsg) -> Option<Cmd> {
    match msg {
        AssistantMsg::Submit { input } => {
            let target = model
                .selection
                .clone()
                .and_then(|selection| model.documents.active_id().map(|id| (id, selection)));
            let request = model.assistant.begin(&input, target)?;
            Some(Cmd::SendAssistantRequest {
                request_id: request.id,
                prompt: request.prompt,
            })
        }

        AssistantMsg::Response { request_id, result } => {
            match model.assistant.resolve(request_id, result)? {
                Resolution::Answered => None,
                Resolution::Edit {
                    text,
                    document_id,
                    selection,
                } => match model.propose_for(document_id, text, selection) {
                    Ok(()) => Some(Cmd::FlushReplacement),
                    Err(CoreError::UnknownDocument(id)) => {
                        tracing::warn!(?id, "assistant reply for a deleted document dropped");
                        None
                    }
                    Err(e) => Some(status(model, e.to_string())),
                },
                Resolution::Stale {
                    text,
                    document_id,
                    selection,
                } => {
                    // Accepted, then discarded; a user edit already waiting is left alone
                    if !model.queue.is_pending()
                        && model.propose_for(document_id, text, selection).is_ok()
                    {
                        model.discard_replacement();
                    }
                    tracing::debug!(request_id, "assistant reply for a moved selection dropped");
                    Some(status(model, "Edit dropped: the selection has changed"))
                }
                Resolution::Failed(e) => Some(status(model, e.to_string())),
            }
        }
    }
}
