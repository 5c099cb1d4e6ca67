//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::assistant::AssistantError;
use crate::commands::ContextAction;
use crate::model::DocumentId;
use crate::selection::{Selection, Space};

/// Selection events reported by an editing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMsg {
    /// The surface of `space` selected `anchor..head` in its own coordinates
    Surface {
        space: Space,
        anchor: usize,
        head: usize,
    },
    /// The surface lost its selection
    Clear,
}

/// Replacement requests and their resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementMsg {
    /// Propose `text` for `selection` in the active document
    Request { text: String, selection: Selection },
    /// Apply whatever is pending
    Flush,
    /// Drop whatever is pending
    Discard,
    /// Context-menu action on the current selection
    ContextAction(ContextAction),
}

/// Document set and content messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMsg {
    /// The user typed into the surface of `space`
    ContentChanged { space: Space, content: String },
    Undo,
    Redo,
    New,
    Rename { id: DocumentId, name: String },
    Delete(DocumentId),
    Activate(DocumentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeMsg {
    Switch(Space),
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantMsg {
    /// Ask the assistant. With a selection this is an edit request.
    Submit { input: String },
    /// Provider result for a request
    Response {
        request_id: u64,
        result: Result<String, AssistantError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    ToggleTheme,
    /// Result of the last snapshot write
    Persisted(Result<(), String>),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Selection(SelectionMsg),
    Replacement(ReplacementMsg),
    Document(DocumentMsg),
    Mode(ModeMsg),
    Assistant(AssistantMsg),
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn select(space: Space, anchor: usize, head: usize) -> Self {
        Msg::Selection(SelectionMsg::Surface {
            space,
            anchor,
            head,
        })
    }

    pub fn replace(text: impl Into<String>, selection: Selection) -> Self {
        Msg::Replacement(ReplacementMsg::Request {
            text: text.into(),
            selection,
        })
    }

    pub fn switch_mode(mode: Space) -> Self {
        Msg::Mode(ModeMsg::Switch(mode))
    }

    pub fn undo() -> Self {
        Msg::Document(DocumentMsg::Undo)
    }

    pub fn redo() -> Self {
        Msg::Document(DocumentMsg::Redo)
    }
}
