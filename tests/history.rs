//! Per-document undo/redo history

mod common;

use common::{content, replace, select, test_model, test_model_with};
use twinmark::messages::{DocumentMsg, Msg};
use twinmark::model::{DocumentId, HistoryState};
use twinmark::update::update;
use twinmark::Space;

fn undo(model: &mut twinmark::AppModel) {
    update(model, Msg::undo());
}

fn redo(model: &mut twinmark::AppModel) {
    update(model, Msg::redo());
}

#[test]
fn test_undo_restores_previous_content() {
    let mut model = test_model("Hello world");
    replace(&mut model, 0, 5, "Hi");
    assert_eq!(content(&model), "Hi world");

    undo(&mut model);
    assert_eq!(content(&model), "Hello world");

    redo(&mut model);
    assert_eq!(content(&model), "Hi world");
}

#[test]
fn test_undo_with_nothing_to_undo() {
    let mut model = test_model("Hello world");
    assert_eq!(update(&mut model, Msg::undo()), None);
    assert_eq!(content(&model), "Hello world");
    assert_eq!(
        model.documents.history().state(DocumentId(1)),
        HistoryState::Clean
    );
}

#[test]
fn test_multiple_undo_steps() {
    let mut model = test_model("abc");
    replace(&mut model, 0, 1, "x");
    replace(&mut model, 1, 2, "y");
    replace(&mut model, 2, 3, "z");
    assert_eq!(content(&model), "xyz");

    undo(&mut model);
    undo(&mut model);
    assert_eq!(content(&model), "xbc");
    undo(&mut model);
    assert_eq!(content(&model), "abc");
    undo(&mut model);
    assert_eq!(content(&model), "abc");
}

#[test]
fn test_new_edit_clears_redo() {
    let mut model = test_model("Hello world");
    replace(&mut model, 0, 5, "Hi");
    undo(&mut model);
    assert!(model.documents.history().can_redo(DocumentId(1)));

    replace(&mut model, 6, 11, "there");
    assert_eq!(content(&model), "Hello there");
    assert!(!model.documents.history().can_redo(DocumentId(1)));

    redo(&mut model);
    assert_eq!(content(&model), "Hello there");
}

#[test]
fn test_direct_edits_are_undoable() {
    let mut model = test_model("Hello");
    update(
        &mut model,
        Msg::Document(DocumentMsg::ContentChanged {
            space: Space::Text,
            content: "Hello!".to_string(),
        }),
    );
    undo(&mut model);
    assert_eq!(content(&model), "Hello");
}

#[test]
fn test_noop_replacement_records_nothing() {
    let mut model = test_model("Hello world");
    replace(&mut model, 0, 5, "Hello");
    assert_eq!(content(&model), "Hello world");
    assert!(!model.documents.history().can_undo(DocumentId(1)));
}

#[test]
fn test_history_depth_is_bounded() {
    let mut model = test_model_with(vec!["a"], Space::Text, 2);
    replace(&mut model, 0, 1, "b");
    replace(&mut model, 0, 1, "c");
    replace(&mut model, 0, 1, "d");

    undo(&mut model);
    undo(&mut model);
    assert_eq!(content(&model), "b");
    undo(&mut model);
    assert_eq!(content(&model), "b");
}

#[test]
fn test_history_is_per_document() {
    let mut model = test_model_with(vec!["one", "two"], Space::Text, 0);
    replace(&mut model, 0, 3, "ONE");

    update(&mut model, Msg::Document(DocumentMsg::Activate(DocumentId(2))));
    replace(&mut model, 0, 3, "TWO");
    undo(&mut model);
    assert_eq!(content(&model), "two");
    // Undoing again in this document does not touch the other one
    undo(&mut model);
    assert_eq!(model.documents.get(DocumentId(1)).unwrap().content, "ONE");

    update(&mut model, Msg::Document(DocumentMsg::Activate(DocumentId(1))));
    undo(&mut model);
    assert_eq!(content(&model), "one");
}

#[test]
fn test_mode_switch_creates_no_history() {
    let mut model = test_model("*a*  and __b__\n");
    update(&mut model, Msg::switch_mode(Space::Structured));
    update(&mut model, Msg::switch_mode(Space::Text));

    assert_eq!(content(&model), "*a*  and __b__\n");
    assert!(!model.documents.history().can_undo(DocumentId(1)));
}

#[test]
fn test_structured_edit_undo() {
    let mut model = test_model("Hello world\n");
    update(&mut model, Msg::switch_mode(Space::Structured));
    replace(&mut model, 1, 6, "Hi");
    assert_eq!(content(&model), "Hi world\n");

    undo(&mut model);
    assert_eq!(content(&model), "Hello world\n");
    // The structured view was rebuilt from the restored content
    let selection = select(&mut model, 1, 6);
    assert_eq!(selection.text(), "Hello");
}

#[test]
fn test_deleted_document_history_is_forgotten() {
    let mut model = test_model_with(vec!["one", "two"], Space::Text, 0);
    replace(&mut model, 0, 3, "ONE");
    update(&mut model, Msg::Document(DocumentMsg::Delete(DocumentId(1))));
    assert_eq!(
        model.documents.history().state(DocumentId(1)),
        HistoryState::Clean
    );
}
