//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod assistant;
mod document;
mod mode;
mod replacement;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;
use crate::selection::Space;

#[cfg(debug_assertions)]
use crate::tracing::SessionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use assistant::update_assistant;
pub use document::update_document;
pub use mode::update_mode;
pub use replacement::{update_replacement, update_selection};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Selection(m) => replacement::update_selection(model, m),
        Msg::Replacement(m) => replacement::update_replacement(model, m),
        Msg::Document(m) => document::update_document(model, m),
        Msg::Mode(m) => mode::update_mode(model, m),
        Msg::Assistant(m) => assistant::update_assistant(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after session state and logs the diff.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let before = SessionSnapshot::from_model(model);
    let result = update_inner(model, msg);
    let after = SessionSnapshot::from_model(model);

    if let Some(diff) = before.diff(&after) {
        debug!(target: "session", %diff, "state changed");
    }
    result
}

/// Display name for a message, without large payloads
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{AssistantMsg, DocumentMsg};

    match msg {
        Msg::Selection(m) => format!("Selection::{:?}", m),
        Msg::Replacement(m) => format!("Replacement::{:?}", m),
        Msg::Document(DocumentMsg::ContentChanged { space, content }) => format!(
            "Document::ContentChanged({:?}, {} chars)",
            space,
            content.chars().count()
        ),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Mode(m) => format!("Mode::{:?}", m),
        Msg::Assistant(AssistantMsg::Submit { .. }) => "Assistant::Submit".to_string(),
        Msg::Assistant(AssistantMsg::Response { request_id, result }) => format!(
            "Assistant::Response({}, ok={})",
            request_id,
            result.is_ok()
        ),
        Msg::App(m) => format!("App::{:?}", m),
    }
}

// ============================================================================
// Shared command builders
// ============================================================================

/// Bring the active surface in line with the active document
pub fn sync_surface(model: &AppModel) -> Cmd {
    let content = model.active_content().to_string();
    match model.mode() {
        Space::Text => Cmd::SyncTextSurface {
            content,
            select: None,
        },
        Space::Structured => Cmd::SyncStructuredSurface { markdown: content },
    }
}

/// Capture the current state for persistence
pub(crate) fn persist(model: &AppModel) -> Cmd {
    Cmd::PersistSnapshot(model.snapshot())
}

/// Set the status line and surface it
pub(crate) fn status(model: &mut AppModel, message: impl Into<String>) -> Cmd {
    let message = message.into();
    model.status = Some(message.clone());
    Cmd::ShowMessage(message)
}
