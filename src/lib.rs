//! twinmark - selection, replacement and history core for a dual-view
//! markdown editor
//!
//! One document is edited through either a raw source view or a structured
//! (rich-text) view. Selections captured in either view can be targeted by
//! proposed replacements, which are applied in the matching coordinate space
//! and recorded in a per-document undo history. State changes follow the Elm
//! Architecture: `Msg` in, `update`, `Cmd` out.

pub mod adapter;
pub mod assistant;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod coordinator;
pub mod error;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod selection;
pub mod storage;
pub mod structured;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::{CoreError, CoreResult};
pub use messages::Msg;
pub use model::AppModel;
pub use selection::{Selection, Space};
