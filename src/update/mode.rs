//! Mode switching

use super::sync_surface;
use crate::commands::Cmd;
use crate::messages::ModeMsg;
use crate::model::AppModel;

pub fn update_mode(model: &mut AppModel, msg: ModeMsg) -> Option<Cmd> {
    let target = match msg {
        ModeMsg::Switch(mode) => mode,
        ModeMsg::Toggle => model.mode().other(),
    };
    if model.switch_mode(target) {
        Some(sync_surface(model))
    } else {
        None
    }
}
