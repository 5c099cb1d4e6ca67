//! View adapters - translate between an editing surface and the selection model
//!
//! There are exactly two views, so the active one is a closed enum
//! ([`ActiveView`]) dispatching through the shared [`ViewAdapter`] trait.
//! Each adapter can be driven in isolation from a plain content string.

mod structured;
mod text;

use std::ops::Range;

pub use structured::StructuredViewAdapter;
pub use text::TextViewAdapter;

use crate::error::{CoreError, CoreResult};
use crate::model::PendingReplacement;
use crate::selection::{Selection, Space};

/// A selection reported by a surface in its own coordinates.
/// `head` may be before `anchor` for backwards selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSelection {
    pub anchor: usize,
    pub head: usize,
}

impl SurfaceSelection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// `(start, end)` in document order
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }
}

/// Edit command replayed by the structured surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredCommand {
    SetSelection { from: usize, to: usize },
    InsertContent(String),
}

/// How the surface should reflect an applied replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEdit {
    /// Show the new content and select the inserted text
    Text { select: Range<usize> },
    /// Replay these commands on the rich-text editor
    Structured { commands: Vec<StructuredCommand> },
}

/// Result of applying a replacement inside an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Canonical content to write back to the document store
    pub content: String,
    pub edit: SurfaceEdit,
}

/// Capabilities shared by both editing views
pub trait ViewAdapter {
    /// Coordinate space of this adapter's selections
    fn space(&self) -> Space;

    /// Rebuild internal structure from canonical content
    fn load(&mut self, content: &str);

    /// Current content in canonical (document store) form
    fn content(&self) -> String;

    /// Lift a surface selection into the selection model.
    /// Returns `None` when the range covers no text.
    fn capture_selection(&self, event: SurfaceSelection) -> CoreResult<Option<Selection>>;

    /// Apply a replacement expressed in this adapter's space
    fn apply_replacement(&mut self, pending: &PendingReplacement) -> CoreResult<Applied>;

    /// Reject replacements tagged for the other space
    fn ensure_space(&self, pending: &PendingReplacement) -> CoreResult<()> {
        let pending_space = pending.selection.space();
        if pending_space != self.space() {
            tracing::error!(
                adapter = ?self.space(),
                pending = ?pending_space,
                "replacement routed to the wrong adapter"
            );
            return Err(CoreError::WrongSpace {
                adapter: self.space(),
                pending: pending_space,
            });
        }
        Ok(())
    }
}

/// The adapter currently owning the editing surface
#[derive(Debug, Clone)]
pub enum ActiveView {
    Text(TextViewAdapter),
    Structured(StructuredViewAdapter),
}

impl ActiveView {
    /// Build the adapter for `space`, initialized from `content`
    pub fn for_space(space: Space, content: &str) -> Self {
        match space {
            Space::Text => ActiveView::Text(TextViewAdapter::new(content)),
            Space::Structured => ActiveView::Structured(StructuredViewAdapter::new(content)),
        }
    }

    pub fn space(&self) -> Space {
        self.adapter().space()
    }

    pub fn adapter(&self) -> &dyn ViewAdapter {
        match self {
            ActiveView::Text(adapter) => adapter,
            ActiveView::Structured(adapter) => adapter,
        }
    }

    pub fn adapter_mut(&mut self) -> &mut dyn ViewAdapter {
        match self {
            ActiveView::Text(adapter) => adapter,
            ActiveView::Structured(adapter) => adapter,
        }
    }
}
