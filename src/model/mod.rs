//! Application model - the complete state of the editor
//!
//! All state lives in [`AppModel`] and changes only through `update`.

pub mod document;
pub mod history;
pub mod queue;
pub mod settings;

pub use document::{Document, DocumentId, DocumentStore, NEW_DOCUMENT_CONTENT, WELCOME_CONTENT};
pub use history::{HistoryEntry, HistoryLedger, HistoryState};
pub use queue::{PendingReplacement, ReplacementQueue};
pub use settings::{Provider, Settings, ThemeMode};

use crate::adapter::SurfaceSelection;
use crate::assistant::AssistantState;
use crate::config::EditorConfig;
use crate::coordinator::{FlushOutcome, ModeCoordinator, SelectionOutcome};
use crate::error::{CoreError, CoreResult};
use crate::selection::{Selection, Space};
use crate::storage::Snapshot;

/// The complete application model
#[derive(Debug, Clone)]
pub struct AppModel {
    /// Documents, the active document and per-document history
    pub documents: DocumentStore,
    /// Single-slot pending replacement
    pub queue: ReplacementQueue,
    /// Active mode and its view adapter
    pub coordinator: ModeCoordinator,
    pub assistant: AssistantState,
    pub settings: Settings,
    /// Persisted editor configuration
    pub config: EditorConfig,
    /// Latest selection reported by the active surface
    pub selection: Option<Selection>,
    /// Last user-facing status line
    pub status: Option<String>,
}

impl AppModel {
    /// Build the model from configuration and previously persisted state
    pub fn new(config: EditorConfig, snapshot: Snapshot) -> Self {
        let documents = DocumentStore::from_documents(snapshot.documents, config.history_depth);
        let content = documents
            .active()
            .map(|doc| doc.content.as_str())
            .unwrap_or_default();
        let coordinator = ModeCoordinator::new(config.default_mode, content);

        Self {
            documents,
            queue: ReplacementQueue::new(),
            coordinator,
            assistant: AssistantState::new(),
            settings: snapshot.settings,
            config,
            selection: None,
            status: None,
        }
    }

    pub fn mode(&self) -> Space {
        self.coordinator.mode()
    }

    pub fn active_content(&self) -> &str {
        self.documents
            .active()
            .map(|doc| doc.content.as_str())
            .unwrap_or_default()
    }

    /// The selection the user currently has, if any
    pub fn selection_snapshot(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            documents: self.documents.documents().to_vec(),
            settings: self.settings.clone(),
        }
    }

    // ========================================================================
    // Surface events
    // ========================================================================

    /// Record a selection event from the surface of `space`.
    /// Events from a surface that is not active are ignored.
    pub fn on_surface_selection(
        &mut self,
        space: Space,
        event: SurfaceSelection,
    ) -> CoreResult<SelectionOutcome> {
        if space != self.mode() {
            tracing::debug!(?space, "selection from inactive surface ignored");
            return Ok(SelectionOutcome::default());
        }
        let outcome = self.coordinator.on_selection(&mut self.queue, event)?;
        self.selection = outcome.selection.clone();
        self.assistant.note_selection(self.selection.as_ref());
        Ok(outcome)
    }

    /// The user edited the active surface directly
    pub fn on_surface_edit(&mut self, space: Space, content: &str) -> CoreResult<bool> {
        if space != self.mode() {
            tracing::debug!(?space, "edit from inactive surface ignored");
            return Ok(false);
        }
        let id = self.active_id()?;
        let changed = self.documents.replace_content(id, content)?;
        if changed {
            self.coordinator.reload(content);
            self.selection = None;
        }
        Ok(changed)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ========================================================================
    // Replacements
    // ========================================================================

    /// Propose `text` for `selection` in the active document
    pub fn request_replacement(
        &mut self,
        text: impl Into<String>,
        selection: Selection,
    ) -> CoreResult<()> {
        let id = self.active_id()?;
        self.propose_for(id, text, selection)
    }

    /// Propose a replacement against a specific document.
    ///
    /// A newer proposal supersedes an unresolved one.
    pub fn propose_for(
        &mut self,
        document_id: DocumentId,
        text: impl Into<String>,
        selection: Selection,
    ) -> CoreResult<()> {
        if !self.documents.contains(document_id) {
            return Err(CoreError::UnknownDocument(document_id));
        }
        if let Some(old) = self.queue.discard() {
            tracing::debug!(
                from = old.selection.from(),
                to = old.selection.to(),
                "pending replacement superseded"
            );
        }
        self.queue.propose(text, selection, document_id)
    }

    /// Apply the pending replacement, if any
    pub fn flush_replacement(&mut self) -> CoreResult<FlushOutcome> {
        let outcome = self.coordinator.flush(&mut self.documents, &mut self.queue)?;
        if let FlushOutcome::Applied { switched_mode, .. } = &outcome {
            if *switched_mode {
                tracing::debug!(mode = ?self.mode(), "mode switched to apply replacement");
            }
            self.selection = None;
        }
        Ok(outcome)
    }

    pub fn discard_replacement(&mut self) -> Option<PendingReplacement> {
        self.queue.discard()
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn undo(&mut self) -> CoreResult<bool> {
        let id = self.active_id()?;
        let changed = self.documents.undo(id)?;
        if changed {
            self.reload_view();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> CoreResult<bool> {
        let id = self.active_id()?;
        let changed = self.documents.redo(id)?;
        if changed {
            self.reload_view();
        }
        Ok(changed)
    }

    // ========================================================================
    // Mode and documents
    // ========================================================================

    /// Switch the active mode. The document content is not rewritten.
    pub fn switch_mode(&mut self, mode: Space) -> bool {
        let content = self.active_content().to_string();
        let switched = self.coordinator.switch_mode(mode, &content);
        if switched {
            self.selection = None;
        }
        switched
    }

    pub fn new_document(&mut self) -> DocumentId {
        let id = self.documents.create_document();
        self.reload_view();
        id
    }

    pub fn activate_document(&mut self, id: DocumentId) -> CoreResult<()> {
        self.documents.set_active(id)?;
        self.reload_view();
        Ok(())
    }

    pub fn rename_document(&mut self, id: DocumentId, name: impl Into<String>) -> CoreResult<()> {
        self.documents.rename(id, name)
    }

    /// Delete a document. A pending replacement targeting it is dropped when flushed.
    pub fn delete_document(&mut self, id: DocumentId) -> CoreResult<Document> {
        let removed = self.documents.delete(id)?;
        self.documents.ensure_document();
        self.reload_view();
        Ok(removed)
    }

    fn active_id(&self) -> CoreResult<DocumentId> {
        self.documents.active_id().ok_or(CoreError::NoActiveDocument)
    }

    fn reload_view(&mut self) {
        let content = self.active_content().to_string();
        self.coordinator.reload(&content);
        self.selection = None;
    }
}
