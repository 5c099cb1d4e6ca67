//! Document model - the document set, the active document and its content
//!
//! Content is the single source of truth for both editing views. The store is
//! the only place content changes, and every genuine change records the prior
//! content in the [`HistoryLedger`].

use serde::{Deserialize, Serialize};

use super::history::HistoryLedger;
use crate::error::{CoreError, CoreResult};

/// Markdown shown in the document created on first run
pub const WELCOME_CONTENT: &str = r#"# Welcome to twinmark

Edit this document as raw markdown or in the structured view. Switching views never loses content.

## Working with the assistant

1. **Select** some text in either view.
2. **Ask** the assistant to rewrite it, for example "make this shorter".
3. **Apply** the reply. It replaces exactly the range you selected.

- Undo and redo work per document, across both views.
- A new selection cancels a replacement that has not been applied yet.

---

```rust
fn main() {
    println!("Hello from twinmark!");
}
```
"#;

/// Content of a document created with "new document"
pub const NEW_DOCUMENT_CONTENT: &str = "# New File\n";

/// Unique identifier for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

/// A named markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(id: DocumentId, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The document set plus the active document and per-document history
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_document_id: u64,
    history: HistoryLedger,
}

impl DocumentStore {
    /// Create an empty store with the given history depth (0 = unbounded)
    pub fn new(history_depth: usize) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_document_id: 1,
            history: HistoryLedger::with_max_depth(history_depth),
        }
    }

    /// Restore a store from previously persisted documents.
    ///
    /// The first document becomes active. An empty set gets the welcome document.
    pub fn from_documents(documents: Vec<Document>, history_depth: usize) -> Self {
        let mut store = Self::new(history_depth);
        for doc in documents {
            store.add(doc);
        }
        store.ensure_document();
        store
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn active(&self) -> Option<&Document> {
        self.active_id.and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.get(id).is_some()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Allocate the next unused document id
    pub fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_document_id);
        self.next_document_id += 1;
        id
    }

    /// Add a document. The first document added becomes active.
    pub fn add(&mut self, doc: Document) {
        self.next_document_id = self.next_document_id.max(doc.id.0 + 1);
        if self.active_id.is_none() {
            self.active_id = Some(doc.id);
        }
        tracing::debug!(id = doc.id.0, name = %doc.name, "document added");
        self.documents.push(doc);
    }

    /// Create "Untitled N" with the new-document template and activate it
    pub fn create_document(&mut self) -> DocumentId {
        let id = self.next_document_id();
        let name = format!("Untitled {}", self.documents.len() + 1);
        self.add(Document::new(id, name, NEW_DOCUMENT_CONTENT));
        self.active_id = Some(id);
        id
    }

    /// Guarantee a non-empty document set with a valid active document
    pub fn ensure_document(&mut self) {
        if self.documents.is_empty() {
            let id = self.next_document_id();
            self.add(Document::new(id, "Untitled", WELCOME_CONTENT));
        }
        if self.active().is_none() {
            self.active_id = self.documents.first().map(|d| d.id);
        }
    }

    pub fn set_active(&mut self, id: DocumentId) -> CoreResult<()> {
        if !self.contains(id) {
            return Err(CoreError::UnknownDocument(id));
        }
        self.active_id = Some(id);
        Ok(())
    }

    pub fn rename(&mut self, id: DocumentId, name: impl Into<String>) -> CoreResult<()> {
        let doc = self.get_mut(id)?;
        doc.name = name.into();
        Ok(())
    }

    /// Delete a document and its history.
    ///
    /// Deleting the active document activates the first remaining one, or none.
    pub fn delete(&mut self, id: DocumentId) -> CoreResult<Document> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::UnknownDocument(id))?;
        let removed = self.documents.remove(idx);
        self.history.forget(id);

        if self.active_id == Some(id) {
            self.active_id = self.documents.first().map(|d| d.id);
        }
        tracing::debug!(id = id.0, active = ?self.active_id, "document deleted");
        Ok(removed)
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replace a document's content, recording the previous content for undo.
    ///
    /// Writing the content the document already has is a no-op: nothing is
    /// mutated and no history entry is pushed. Returns whether anything changed.
    pub fn replace_content(&mut self, id: DocumentId, content: impl Into<String>) -> CoreResult<bool> {
        let content = content.into();
        let idx = self.index_of(id)?;
        if self.documents[idx].content == content {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut self.documents[idx].content, content);
        self.history.record(id, previous);
        Ok(true)
    }

    /// Restore the previous content of `id`. Returns whether anything changed.
    pub fn undo(&mut self, id: DocumentId) -> CoreResult<bool> {
        let idx = self.index_of(id)?;
        match self.history.undo(id, &self.documents[idx].content) {
            Some(restored) => {
                self.documents[idx].content = restored;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply content undone by [`DocumentStore::undo`]
    pub fn redo(&mut self, id: DocumentId) -> CoreResult<bool> {
        let idx = self.index_of(id)?;
        match self.history.redo(id, &self.documents[idx].content) {
            Some(restored) => {
                self.documents[idx].content = restored;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn index_of(&self, id: DocumentId) -> CoreResult<usize> {
        self.documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::UnknownDocument(id))
    }

    fn get_mut(&mut self, id: DocumentId) -> CoreResult<&mut Document> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CoreError::UnknownDocument(id))
    }
}
