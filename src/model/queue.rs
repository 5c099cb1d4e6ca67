//! Single-slot holder for a proposed replacement awaiting application

use super::document::DocumentId;
use crate::error::{CoreError, CoreResult};
use crate::selection::Selection;

/// A proposed substitution of `selection` with `text`.
///
/// An empty `text` is a deletion. `document_id` is the document that was
/// active when the replacement was proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReplacement {
    pub text: String,
    pub selection: Selection,
    pub document_id: DocumentId,
}

/// At most one pending replacement system-wide
#[derive(Debug, Clone, Default)]
pub struct ReplacementQueue {
    slot: Option<PendingReplacement>,
}

impl ReplacementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the slot. Fails with `QueueBusy` while another replacement is unresolved.
    pub fn propose(
        &mut self,
        text: impl Into<String>,
        selection: Selection,
        document_id: DocumentId,
    ) -> CoreResult<()> {
        if self.slot.is_some() {
            return Err(CoreError::QueueBusy);
        }
        self.slot = Some(PendingReplacement {
            text: text.into(),
            selection,
            document_id,
        });
        Ok(())
    }

    /// Take the pending replacement, leaving the slot empty
    pub fn consume(&mut self) -> Option<PendingReplacement> {
        self.slot.take()
    }

    /// Drop the pending replacement without applying it
    pub fn discard(&mut self) -> Option<PendingReplacement> {
        self.slot.take()
    }

    pub fn peek(&self) -> Option<&PendingReplacement> {
        self.slot.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}
