//! Mode coordinator - owns the active view and routes replacements to it

use crate::adapter::{ActiveView, SurfaceEdit, SurfaceSelection, ViewAdapter};
use crate::error::{CoreError, CoreResult};
use crate::model::{DocumentId, DocumentStore, PendingReplacement, ReplacementQueue};
use crate::selection::{Selection, Space};

/// Why a pending replacement was consumed without touching the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The target document was deleted before application
    DocumentMissing,
    /// Another document became active before application
    DocumentInactive,
    /// The selected range no longer holds the captured text
    StaleSelection,
    /// The selected range no longer fits in the document
    OutOfBounds,
}

/// Result of flushing the replacement queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was pending
    Idle,
    Applied {
        document_id: DocumentId,
        /// The coordinator switched modes to reach the replacement's space
        switched_mode: bool,
        edit: SurfaceEdit,
    },
    Dropped {
        pending: PendingReplacement,
        reason: DropReason,
    },
}

/// Result of a surface selection event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub selection: Option<Selection>,
    /// Pending replacement cancelled because the user moved on
    pub discarded: Option<PendingReplacement>,
}

#[derive(Debug, Clone)]
pub struct ModeCoordinator {
    view: ActiveView,
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::new(Space::Text, "")
    }
}

impl ModeCoordinator {
    pub fn new(mode: Space, content: &str) -> Self {
        Self {
            view: ActiveView::for_space(mode, content),
        }
    }

    /// The mode whose adapter currently owns the surface
    pub fn mode(&self) -> Space {
        self.view.space()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn adapter(&self) -> &dyn ViewAdapter {
        self.view.adapter()
    }

    /// Hand the surface to the other adapter, initialized from `content`.
    ///
    /// The outgoing adapter's structure is dropped. Returns false when `mode`
    /// is already active.
    pub fn switch_mode(&mut self, mode: Space, content: &str) -> bool {
        if self.mode() == mode {
            return false;
        }
        tracing::debug!(from = ?self.mode(), to = ?mode, "switching mode");
        self.view = ActiveView::for_space(mode, content);
        true
    }

    /// Reload the active adapter after the store changed underneath it
    pub fn reload(&mut self, content: &str) {
        self.view.adapter_mut().load(content);
    }

    /// Record a surface selection event.
    ///
    /// A selection different from the pending replacement's target cancels it.
    pub fn on_selection(
        &mut self,
        queue: &mut ReplacementQueue,
        event: SurfaceSelection,
    ) -> CoreResult<SelectionOutcome> {
        let selection = self.view.adapter().capture_selection(event)?;
        let stale = queue
            .peek()
            .is_some_and(|pending| Some(&pending.selection) != selection.as_ref());
        let discarded = if stale { queue.discard() } else { None };
        if let Some(pending) = &discarded {
            tracing::debug!(
                from = pending.selection.from(),
                to = pending.selection.to(),
                "selection moved, pending replacement discarded"
            );
        }
        Ok(SelectionOutcome {
            selection,
            discarded,
        })
    }

    /// Apply the pending replacement, if any.
    ///
    /// The queue is emptied before anything else happens, so a replacement is
    /// never applied twice. When the replacement targets the inactive mode the
    /// coordinator switches first. Replacements whose document is gone or whose
    /// range no longer matches are dropped and leave the document unchanged.
    pub fn flush(
        &mut self,
        store: &mut DocumentStore,
        queue: &mut ReplacementQueue,
    ) -> CoreResult<FlushOutcome> {
        let Some(pending) = queue.consume() else {
            return Ok(FlushOutcome::Idle);
        };
        let document_id = pending.document_id;

        if !store.contains(document_id) {
            tracing::warn!(?document_id, "document deleted before replacement applied");
            return Ok(FlushOutcome::Dropped {
                pending,
                reason: DropReason::DocumentMissing,
            });
        }
        if store.active_id() != Some(document_id) {
            tracing::warn!(?document_id, "document no longer active, replacement dropped");
            return Ok(FlushOutcome::Dropped {
                pending,
                reason: DropReason::DocumentInactive,
            });
        }

        let target = pending.selection.space();
        let switched_mode = self.mode() != target;
        if switched_mode {
            let content = store
                .get(document_id)
                .map(|doc| doc.content.clone())
                .unwrap_or_default();
            self.switch_mode(target, &content);
        }

        match self.view.adapter_mut().apply_replacement(&pending) {
            Ok(applied) => {
                store.replace_content(document_id, applied.content)?;
                tracing::info!(
                    ?document_id,
                    space = ?target,
                    from = pending.selection.from(),
                    to = pending.selection.to(),
                    "replacement applied"
                );
                Ok(FlushOutcome::Applied {
                    document_id,
                    switched_mode,
                    edit: applied.edit,
                })
            }
            Err(CoreError::StaleSelection { .. }) => {
                tracing::warn!(?document_id, "stale replacement dropped");
                Ok(FlushOutcome::Dropped {
                    pending,
                    reason: DropReason::StaleSelection,
                })
            }
            Err(CoreError::OutOfBounds { .. }) => {
                tracing::warn!(?document_id, "out of bounds replacement dropped");
                Ok(FlushOutcome::Dropped {
                    pending,
                    reason: DropReason::OutOfBounds,
                })
            }
            Err(err) => Err(err),
        }
    }
}
