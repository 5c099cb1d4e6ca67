//! Document message handlers (content edits, history, document set)

use super::{persist, status, sync_surface};
use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::AppModel;

pub fn update_document(model: &mut AppModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::ContentChanged { space, content } => {
            match model.on_surface_edit(space, &content) {
                Ok(true) => Some(persist(model)),
                Ok(false) => None,
                Err(e) => {
                    tracing::warn!("edit rejected: {}", e);
                    None
                }
            }
        }

        DocumentMsg::Undo => match model.undo() {
            Ok(true) => Some(Cmd::batch(vec![sync_surface(model), persist(model)])),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("undo failed: {}", e);
                None
            }
        },

        DocumentMsg::Redo => match model.redo() {
            Ok(true) => Some(Cmd::batch(vec![sync_surface(model), persist(model)])),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("redo failed: {}", e);
                None
            }
        },

        DocumentMsg::New => {
            let id = model.new_document();
            tracing::info!(id = id.0, "created document");
            Some(Cmd::batch(vec![sync_surface(model), persist(model)]))
        }

        DocumentMsg::Rename { id, name } => match model.rename_document(id, name) {
            Ok(()) => Some(persist(model)),
            Err(e) => Some(status(model, e.to_string())),
        },

        DocumentMsg::Delete(id) => match model.delete_document(id) {
            Ok(removed) => {
                tracing::info!(id = id.0, name = %removed.name, "deleted document");
                Some(Cmd::batch(vec![sync_surface(model), persist(model)]))
            }
            Err(e) => Some(status(model, e.to_string())),
        },

        DocumentMsg::Activate(id) => match model.activate_document(id) {
            Ok(()) => Some(sync_surface(model)),
            Err(e) => Some(status(model, e.to_string())),
        },
    }
}
