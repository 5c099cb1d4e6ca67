//! App message handlers (settings, persistence results)

use super::{persist, status};
use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::AppModel;

pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::ToggleTheme => {
            model.settings.theme = model.settings.theme.toggled();
            Some(persist(model))
        }

        AppMsg::Persisted(Ok(())) => None,

        AppMsg::Persisted(Err(e)) => {
            tracing::warn!("Failed to persist snapshot: {}", e);
            Some(status(model, format!("Could not save: {}", e)))
        }
    }
}
