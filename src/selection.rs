//! Selection snapshots shared by both editing views.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Coordinate space a selection (and therefore a replacement) is expressed in.
///
/// The space doubles as the editor mode: the active mode is the space whose
/// adapter currently owns the editing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// Character offsets into the raw markdown source
    #[default]
    Text,
    /// Positions in the structured document tree
    Structured,
}

impl Space {
    pub fn label(self) -> &'static str {
        match self {
            Space::Text => "source",
            Space::Structured => "structured",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Space::Text => Space::Structured,
            Space::Structured => Space::Text,
        }
    }
}

/// An immutable snapshot of a non-empty range plus the space it was captured in.
///
/// `text` is the content of `[from, to)` at capture time, not a live reference.
/// Equality is by value so a view can tell whether a pending replacement still
/// targets the user's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    from: usize,
    to: usize,
    text: String,
    space: Space,
}

impl Selection {
    /// Capture a selection.
    ///
    /// Returns `Ok(None)` for a collapsed range (`from == to`), since an empty
    /// range carries no text to act on. Fails with `InvalidRange` when `to < from`.
    pub fn capture(
        from: usize,
        to: usize,
        text: impl Into<String>,
        space: Space,
    ) -> CoreResult<Option<Self>> {
        if to < from {
            return Err(CoreError::InvalidRange { from, to });
        }
        if from == to {
            return Ok(None);
        }
        Ok(Some(Self {
            from,
            to,
            text: text.into(),
            space,
        }))
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn space(&self) -> Space {
        self.space
    }

    /// Width of the range in the selection's own coordinate space
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Always false: collapsed ranges are never captured
    pub fn is_empty(&self) -> bool {
        false
    }
}
