//! Per-document undo/redo ledger of content snapshots.
//!
//! The ledger never decides what counts as an edit: the document store calls
//! [`HistoryLedger::record`] right before it applies a genuinely different
//! content, and routes undo/redo through here so restores are never re-recorded.

use std::collections::HashMap;

use super::document::DocumentId;

/// Whether a document has anything to undo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// `past` is empty
    Clean,
    /// `past` holds at least one snapshot
    Dirty,
}

/// Undo/redo stacks for one document.
///
/// Both stacks keep their most recent snapshot last.
#[derive(Debug, Clone, Default)]
pub struct HistoryEntry {
    past: Vec<String>,
    future: Vec<String>,
}

impl HistoryEntry {
    /// Push a prior snapshot (clears redo). `max_depth == 0` means unbounded.
    fn push(&mut self, previous: String, max_depth: usize) {
        self.future.clear();
        self.past.push(previous);
        self.evict(max_depth);
    }

    /// FIFO eviction of the oldest undo snapshots beyond `max_depth`
    fn evict(&mut self, max_depth: usize) {
        if max_depth > 0 && self.past.len() > max_depth {
            let excess = self.past.len() - max_depth;
            self.past.drain(..excess);
        }
    }

    fn undo(&mut self, current: &str) -> Option<String> {
        let restored = self.past.pop()?;
        self.future.push(current.to_string());
        Some(restored)
    }

    fn redo(&mut self, current: &str, max_depth: usize) -> Option<String> {
        let restored = self.future.pop()?;
        self.past.push(current.to_string());
        self.evict(max_depth);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    pub fn state(&self) -> HistoryState {
        if self.past.is_empty() {
            HistoryState::Clean
        } else {
            HistoryState::Dirty
        }
    }
}

/// Undo/redo stacks for every document, keyed by id
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: HashMap<DocumentId, HistoryEntry>,
    max_depth: usize,
}

impl HistoryLedger {
    /// Create an unbounded ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger keeping at most `max_depth` undo snapshots per document
    /// (0 = unbounded)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_depth,
        }
    }

    /// Record the content a document had before a change
    pub fn record(&mut self, id: DocumentId, previous: String) {
        let max_depth = self.max_depth;
        self.entries.entry(id).or_default().push(previous, max_depth);
    }

    /// Pop the last snapshot for `id`, stashing `current` for redo.
    /// Returns `None` (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self, id: DocumentId, current: &str) -> Option<String> {
        self.entries.get_mut(&id)?.undo(current)
    }

    /// Symmetric to [`HistoryLedger::undo`]
    pub fn redo(&mut self, id: DocumentId, current: &str) -> Option<String> {
        let max_depth = self.max_depth;
        self.entries.get_mut(&id)?.redo(current, max_depth)
    }

    /// Drop the stacks of a deleted document
    pub fn forget(&mut self, id: DocumentId) {
        self.entries.remove(&id);
    }

    pub fn entry(&self, id: DocumentId) -> Option<&HistoryEntry> {
        self.entries.get(&id)
    }

    pub fn state(&self, id: DocumentId) -> HistoryState {
        self.entries
            .get(&id)
            .map(HistoryEntry::state)
            .unwrap_or(HistoryState::Clean)
    }

    pub fn can_undo(&self, id: DocumentId) -> bool {
        self.entries.get(&id).is_some_and(HistoryEntry::can_undo)
    }

    pub fn can_redo(&self, id: DocumentId) -> bool {
        self.entries.get(&id).is_some_and(HistoryEntry::can_redo)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: DocumentId = DocumentId(1);

    #[test]
    fn test_record_then_undo_redo() {
        let mut ledger = HistoryLedger::new();
        ledger.record(DOC, "c0".to_string());
        ledger.record(DOC, "c1".to_string());
        assert_eq!(ledger.state(DOC), HistoryState::Dirty);

        assert_eq!(ledger.undo(DOC, "c2").as_deref(), Some("c1"));
        assert_eq!(ledger.undo(DOC, "c1").as_deref(), Some("c0"));
        assert_eq!(ledger.state(DOC), HistoryState::Clean);
        assert!(ledger.can_redo(DOC));

        assert_eq!(ledger.redo(DOC, "c0").as_deref(), Some("c1"));
        assert_eq!(ledger.redo(DOC, "c1").as_deref(), Some("c2"));
        assert!(!ledger.can_redo(DOC));
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut ledger = HistoryLedger::new();
        assert_eq!(ledger.undo(DOC, "anything"), None);
        assert_eq!(ledger.redo(DOC, "anything"), None);
        assert!(ledger.entry(DOC).is_none());

        ledger.record(DOC, "a".to_string());
        ledger.undo(DOC, "b");
        // Nothing left to undo: state must be untouched
        assert_eq!(ledger.undo(DOC, "a"), None);
        assert_eq!(ledger.entry(DOC).unwrap().redo_count(), 1);
    }

    #[test]
    fn test_record_clears_future() {
        let mut ledger = HistoryLedger::new();
        ledger.record(DOC, "c0".to_string());
        ledger.undo(DOC, "c1");
        assert!(ledger.can_redo(DOC));

        ledger.record(DOC, "c0".to_string());
        assert!(!ledger.can_redo(DOC));
        assert_eq!(ledger.redo(DOC, "c3"), None);
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let mut ledger = HistoryLedger::with_max_depth(3);
        for i in 0..5 {
            ledger.record(DOC, format!("c{}", i));
        }
        let entry = ledger.entry(DOC).unwrap();
        assert_eq!(entry.undo_count(), 3);

        assert_eq!(ledger.undo(DOC, "c5").as_deref(), Some("c4"));
        assert_eq!(ledger.undo(DOC, "c4").as_deref(), Some("c3"));
        assert_eq!(ledger.undo(DOC, "c3").as_deref(), Some("c2"));
        assert_eq!(ledger.undo(DOC, "c2"), None);
        // Eviction never costs redo availability
        assert_eq!(ledger.entry(DOC).unwrap().redo_count(), 3);
    }

    #[test]
    fn test_redo_respects_max_depth() {
        let mut ledger = HistoryLedger::with_max_depth(2);
        ledger.record(DOC, "c0".to_string());
        ledger.record(DOC, "c1".to_string());
        assert_eq!(ledger.undo(DOC, "c2").as_deref(), Some("c1"));
        assert_eq!(ledger.undo(DOC, "c1").as_deref(), Some("c0"));

        for _ in 0..3 {
            assert_eq!(ledger.redo(DOC, "c0").as_deref(), Some("c1"));
            assert_eq!(ledger.redo(DOC, "c1").as_deref(), Some("c2"));
            assert_eq!(ledger.entry(DOC).unwrap().undo_count(), 2);
            assert_eq!(ledger.undo(DOC, "c2").as_deref(), Some("c1"));
            assert_eq!(ledger.undo(DOC, "c1").as_deref(), Some("c0"));
        }
        assert_eq!(ledger.entry(DOC).unwrap().undo_count(), 0);
        assert_eq!(ledger.entry(DOC).unwrap().redo_count(), 2);
    }

    #[test]
    fn test_entries_are_per_document() {
        let mut ledger = HistoryLedger::new();
        let other = DocumentId(2);
        ledger.record(DOC, "a".to_string());
        assert!(ledger.can_undo(DOC));
        assert!(!ledger.can_undo(other));

        ledger.forget(DOC);
        assert!(!ledger.can_undo(DOC));
        assert_eq!(ledger.state(DOC), HistoryState::Clean);
    }
}
