//! Error taxonomy for the selection / replacement / history core

use thiserror::Error;

use crate::model::DocumentId;
use crate::selection::Space;

/// Errors raised by the reconciliation core.
///
/// None of these are fatal to the process. `WrongSpace` is a programming
/// invariant violation and aborts only the operation that triggered it;
/// the rest are rejected inputs or stale state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid selection range: to ({to}) is before from ({from})")]
    InvalidRange { from: usize, to: usize },

    #[error("a replacement is already pending")]
    QueueBusy,

    #[error("replacement tagged for {pending:?} handed to the {adapter:?} adapter")]
    WrongSpace { adapter: Space, pending: Space },

    #[error("selection no longer matches the document at {from}..{to}")]
    StaleSelection { from: usize, to: usize },

    #[error("range {from}..{to} is outside the document (size {size})")]
    OutOfBounds { from: usize, to: usize, size: usize },

    #[error("unknown document {0:?}")]
    UnknownDocument(DocumentId),

    #[error("no active document")]
    NoActiveDocument,
}

pub type CoreResult<T> = Result<T, CoreError>;
