//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::ops::Range;

use crate::adapter::StructuredCommand;
use crate::selection::{Selection, Space};
use crate::storage::Snapshot;

// ============================================================================
// Context menu
// ============================================================================

/// Preset assistant instructions offered on a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistPreset {
    FixSpelling,
    Summarize,
    Shorter,
    Longer,
    Professional,
    Casual,
}

impl AssistPreset {
    pub const ALL: [AssistPreset; 6] = [
        AssistPreset::FixSpelling,
        AssistPreset::Summarize,
        AssistPreset::Shorter,
        AssistPreset::Longer,
        AssistPreset::Professional,
        AssistPreset::Casual,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssistPreset::FixSpelling => "Fix Spelling & Grammar",
            AssistPreset::Summarize => "Summarize",
            AssistPreset::Shorter => "Make Shorter",
            AssistPreset::Longer => "Make Longer",
            AssistPreset::Professional => "Change Tone to Professional",
            AssistPreset::Casual => "Change Tone to Casual",
        }
    }

    /// Instruction sent to the assistant
    pub fn prompt(self) -> &'static str {
        match self {
            AssistPreset::FixSpelling => "Fix spelling and grammar. Return only the corrected text.",
            AssistPreset::Summarize => "Summarize the text. Return only the summary.",
            AssistPreset::Shorter => "Make the text shorter. Return only the modified text.",
            AssistPreset::Longer => "Make the text longer. Return only the modified text.",
            AssistPreset::Professional => {
                "Rewrite the text in a professional tone. Return only the modified text."
            }
            AssistPreset::Casual => {
                "Rewrite the text in a casual tone. Return only the modified text."
            }
        }
    }
}

/// Actions offered on a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    Copy,
    Cut,
    Paste(String),
    Bold,
    Italic,
    Assist(AssistPreset),
}

impl ContextAction {
    /// Whether the action is offered in `mode`. Formatting wraps raw
    /// markdown, so it is only offered on the source view.
    pub fn available_in(&self, mode: Space) -> bool {
        match self {
            ContextAction::Bold | ContextAction::Italic => mode == Space::Text,
            _ => true,
        }
    }

    /// Replacement text this action proposes directly, if any
    pub fn replacement_for(&self, selection: &Selection) -> Option<String> {
        match self {
            ContextAction::Cut => Some(String::new()),
            ContextAction::Paste(text) => Some(text.clone()),
            ContextAction::Bold => Some(format!("**{}**", selection.text())),
            ContextAction::Italic => Some(format!("*{}*", selection.text())),
            ContextAction::Copy | ContextAction::Assist(_) => None,
        }
    }

    /// Whether the action puts the selection on the clipboard
    pub fn copies(&self) -> bool {
        matches!(self, ContextAction::Copy | ContextAction::Cut)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Show `content` in the source view, optionally selecting a char range
    SyncTextSurface {
        content: String,
        select: Option<Range<usize>>,
    },
    /// Rebuild the structured view from `markdown`
    SyncStructuredSurface { markdown: String },
    /// Replay an applied edit on the structured view
    ReplayStructuredEdit { commands: Vec<StructuredCommand> },
    /// Apply the pending replacement on the next turn
    FlushReplacement,
    /// Write the document set and settings to the store
    PersistSnapshot(Snapshot),
    /// Ask the assistant provider; the result comes back as `AssistantMsg::Response`
    SendAssistantRequest { request_id: u64, prompt: String },
    CopyToClipboard(String),
    /// User-facing status line
    ShowMessage(String),
}

impl Cmd {
    /// Create a batch of commands, collapsing trivial cases
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }
}
