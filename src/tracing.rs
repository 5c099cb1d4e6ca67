//! Tracing setup and state snapshots for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=twinmark::coordinator=debug` - module-level filtering
//! - `RUST_LOG=message=debug,session=debug` - update loop only
//!
//! # Log Files
//!
//! Logs are written to `~/.config/twinmark/logs/twinmark.log` with daily rotation.
//! File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{AppModel, DocumentId};
use crate::selection::Space;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "twinmark.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of session state for diffing around an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Space,
    pub active: Option<DocumentId>,
    pub content_chars: usize,
    pub selection: Option<(usize, usize)>,
    pub pending: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl SessionSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        let active = model.documents.active_id();
        let entry = active.and_then(|id| model.documents.history().entry(id));
        Self {
            mode: model.mode(),
            active,
            content_chars: model.active_content().chars().count(),
            selection: model.selection.as_ref().map(|s| (s.from(), s.to())),
            pending: model.queue.is_pending(),
            undo_depth: entry.map_or(0, |e| e.undo_count()),
            redo_depth: entry.map_or(0, |e| e.redo_count()),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SessionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mode != other.mode {
            changes.push(format!("mode: {:?} → {:?}", self.mode, other.mode));
        }
        if self.active != other.active {
            changes.push(format!("active: {:?} → {:?}", self.active, other.active));
        }
        if self.content_chars != other.content_chars {
            changes.push(format!(
                "content: {} → {} chars",
                self.content_chars, other.content_chars
            ));
        }
        if self.selection != other.selection {
            changes.push(format!("selection: {:?} → {:?}", self.selection, other.selection));
        }
        if self.pending != other.pending {
            let status = if other.pending { "queued" } else { "cleared" };
            changes.push(format!("replacement {}", status));
        }
        if (self.undo_depth, self.redo_depth) != (other.undo_depth, other.redo_depth) {
            changes.push(format!(
                "history: {}/{} → {}/{}",
                self.undo_depth, self.redo_depth, other.undo_depth, other.redo_depth
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
