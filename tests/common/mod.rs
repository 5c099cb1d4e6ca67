//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use twinmark::commands::Cmd;
use twinmark::config::EditorConfig;
use twinmark::messages::{Msg, ReplacementMsg};
use twinmark::model::{AppModel, Document, DocumentId, Settings};
use twinmark::runtime::{HeadlessSurface, Runtime};
use twinmark::storage::{MemoryStore, Snapshot};
use twinmark::update::update;
use twinmark::{Selection, Space};

/// Environment variable the test config reads the assistant key from
pub const TEST_KEY_ENV: &str = "TWINMARK_TEST_API_KEY";

/// Model with a single document (id 1) holding `content`, in source mode
pub fn test_model(content: &str) -> AppModel {
    test_model_with(vec![content], Space::Text, 0)
}

/// Model with a single document starting in `mode`
pub fn test_model_in(content: &str, mode: Space) -> AppModel {
    test_model_with(vec![content], mode, 0)
}

/// Model with one document per entry (ids 1, 2, ...); the first is active
pub fn test_model_with(contents: Vec<&str>, mode: Space, history_depth: usize) -> AppModel {
    let documents = contents
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            let id = i as u64 + 1;
            Document::new(DocumentId(id), format!("Doc {}", id), content)
        })
        .collect();
    let config = EditorConfig {
        default_mode: mode,
        history_depth,
        api_key_env: TEST_KEY_ENV.to_string(),
        ..EditorConfig::default()
    };
    AppModel::new(
        config,
        Snapshot {
            documents,
            settings: Settings::default(),
        },
    )
}

/// Select `from..to` on the active surface and return the captured selection
pub fn select(model: &mut AppModel, from: usize, to: usize) -> Selection {
    let space = model.mode();
    update(model, Msg::select(space, from, to));
    model
        .selection_snapshot()
        .cloned()
        .expect("range should select text")
}

/// Propose `text` for `selection` without flushing
pub fn request(model: &mut AppModel, text: &str, selection: Selection) -> Option<Cmd> {
    update(model, Msg::replace(text, selection))
}

pub fn flush(model: &mut AppModel) -> Option<Cmd> {
    update(model, Msg::Replacement(ReplacementMsg::Flush))
}

/// Select, request and flush in one go
pub fn replace(model: &mut AppModel, from: usize, to: usize, text: &str) -> Option<Cmd> {
    let selection = select(model, from, to);
    let cmd = request(model, text, selection);
    assert_eq!(cmd, Some(Cmd::FlushReplacement));
    flush(model)
}

pub fn content(model: &AppModel) -> String {
    model.active_content().to_string()
}

/// Runtime over an in-memory store with a single document and an assistant key set
pub fn test_runtime(content: &str) -> Runtime<MemoryStore, HeadlessSurface> {
    std::env::set_var(TEST_KEY_ENV, "test-key");
    runtime_for(test_model(content))
}

pub fn runtime_for(model: AppModel) -> Runtime<MemoryStore, HeadlessSurface> {
    Runtime::new(model, MemoryStore::new(), HeadlessSurface::new())
}
