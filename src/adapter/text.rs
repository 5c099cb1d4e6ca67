//! Raw markdown view backed by a rope

use ropey::Rope;

use super::{Applied, SurfaceEdit, SurfaceSelection, ViewAdapter};
use crate::error::{CoreError, CoreResult};
use crate::model::PendingReplacement;
use crate::selection::{Selection, Space};

/// Source view. Positions are character offsets into the markdown.
#[derive(Debug, Clone, Default)]
pub struct TextViewAdapter {
    buffer: Rope,
}

impl TextViewAdapter {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: Rope::from_str(content),
        }
    }

    /// Number of characters in the buffer
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn check_bounds(&self, from: usize, to: usize) -> CoreResult<()> {
        let size = self.buffer.len_chars();
        if to < from {
            return Err(CoreError::InvalidRange { from, to });
        }
        if to > size {
            return Err(CoreError::OutOfBounds { from, to, size });
        }
        Ok(())
    }

    fn slice_text(&self, from: usize, to: usize) -> String {
        self.buffer.slice(from..to).to_string()
    }
}

impl ViewAdapter for TextViewAdapter {
    fn space(&self) -> Space {
        Space::Text
    }

    fn load(&mut self, content: &str) {
        self.buffer = Rope::from_str(content);
    }

    fn content(&self) -> String {
        self.buffer.to_string()
    }

    fn capture_selection(&self, event: SurfaceSelection) -> CoreResult<Option<Selection>> {
        let (from, to) = event.range();
        self.check_bounds(from, to)?;
        Selection::capture(from, to, self.slice_text(from, to), Space::Text)
    }

    fn apply_replacement(&mut self, pending: &PendingReplacement) -> CoreResult<Applied> {
        self.ensure_space(pending)?;
        let selection = &pending.selection;
        let (from, to) = (selection.from(), selection.to());
        self.check_bounds(from, to)?;

        if self.slice_text(from, to) != selection.text() {
            tracing::debug!(from, to, "source changed under the selection");
            return Err(CoreError::StaleSelection { from, to });
        }

        self.buffer.remove(from..to);
        self.buffer.insert(from, &pending.text);
        let inserted = pending.text.chars().count();

        Ok(Applied {
            content: self.buffer.to_string(),
            edit: SurfaceEdit::Text {
                select: from..from + inserted,
            },
        })
    }
}
