//! Rich-text view backed by the block tree

use super::{Applied, StructuredCommand, SurfaceEdit, SurfaceSelection, ViewAdapter};
use crate::error::{CoreError, CoreResult};
use crate::model::PendingReplacement;
use crate::selection::{Selection, Space};
use crate::structured::StructuredDoc;

/// Structured view. Positions index the block tree, see [`crate::structured`].
#[derive(Debug, Clone, Default)]
pub struct StructuredViewAdapter {
    doc: StructuredDoc,
    selection: Option<(usize, usize)>,
}

impl StructuredViewAdapter {
    pub fn new(content: &str) -> Self {
        Self {
            doc: StructuredDoc::parse(content),
            selection: None,
        }
    }

    pub fn doc(&self) -> &StructuredDoc {
        &self.doc
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Select `[from, to)` in tree positions
    pub fn set_selection(&mut self, from: usize, to: usize) -> CoreResult<()> {
        self.doc.check_range(from, to)?;
        self.selection = Some((from, to));
        Ok(())
    }

    /// Replace the current selection with markdown `text`.
    /// Without a selection this inserts at the start of the document.
    pub fn insert_content(&mut self, text: &str) -> CoreResult<()> {
        let (from, to) = self.selection.take().unwrap_or((0, 0));
        self.doc.replace_markdown(from, to, text)
    }
}

impl ViewAdapter for StructuredViewAdapter {
    fn space(&self) -> Space {
        Space::Structured
    }

    fn load(&mut self, content: &str) {
        self.doc = StructuredDoc::parse(content);
        self.selection = None;
    }

    fn content(&self) -> String {
        self.doc.to_markdown()
    }

    fn capture_selection(&self, event: SurfaceSelection) -> CoreResult<Option<Selection>> {
        let (from, to) = event.range();
        let size = self.doc.size();
        if to > size {
            return Err(CoreError::OutOfBounds { from, to, size });
        }
        // A range spanning only block boundaries selects nothing
        let text = self.doc.text_between(from, to);
        if text.is_empty() {
            return Ok(None);
        }
        Selection::capture(from, to, text, Space::Structured)
    }

    fn apply_replacement(&mut self, pending: &PendingReplacement) -> CoreResult<Applied> {
        self.ensure_space(pending)?;
        let selection = &pending.selection;
        let (from, to) = (selection.from(), selection.to());
        self.doc.check_range(from, to)?;

        if self.doc.text_between(from, to) != selection.text() {
            tracing::debug!(from, to, "tree changed under the selection");
            return Err(CoreError::StaleSelection { from, to });
        }

        self.set_selection(from, to)?;
        self.insert_content(&pending.text)?;

        Ok(Applied {
            content: self.doc.to_markdown(),
            edit: SurfaceEdit::Structured {
                commands: vec![
                    StructuredCommand::SetSelection { from, to },
                    StructuredCommand::InsertContent(pending.text.clone()),
                ],
            },
        })
    }
}
