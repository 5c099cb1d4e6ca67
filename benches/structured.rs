//! Benchmarks for structured parsing, serialization and replacement
//!
//! Run with: cargo bench structured

use twinmark::adapter::{TextViewAdapter, ViewAdapter};
use twinmark::model::{DocumentId, PendingReplacement, WELCOME_CONTENT};
use twinmark::structured::StructuredDoc;
use twinmark::{Selection, Space};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn large_document(copies: usize) -> String {
    WELCOME_CONTENT.repeat(copies)
}

// ============================================================================
// Parse / serialize
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn parse(bencher: divan::Bencher, copies: usize) {
    let source = large_document(copies);
    bencher.bench(|| StructuredDoc::parse(divan::black_box(&source)));
}

#[divan::bench(args = [1, 10, 100])]
fn serialize(bencher: divan::Bencher, copies: usize) {
    let doc = StructuredDoc::parse(&large_document(copies));
    bencher.bench(|| divan::black_box(&doc).to_markdown());
}

#[divan::bench(args = [1, 10, 100])]
fn mode_roundtrip(bencher: divan::Bencher, copies: usize) {
    let source = large_document(copies);
    bencher.bench(|| StructuredDoc::parse(divan::black_box(&source)).to_markdown());
}

// ============================================================================
// Replacement
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn structured_replace_heading(bencher: divan::Bencher, copies: usize) {
    let doc = StructuredDoc::parse(&large_document(copies));
    bencher
        .with_inputs(|| doc.clone())
        .bench_local_values(|mut doc| {
            let _ = doc.replace_markdown(1, 8, divan::black_box("**Hello**"));
            doc
        });
}

#[divan::bench(args = [1, 10, 100])]
fn text_apply_middle(bencher: divan::Bencher, copies: usize) {
    let source = large_document(copies);
    let from = source.chars().count() / 2;
    let text: String = source.chars().skip(from).take(5).collect();

    bencher
        .with_inputs(|| {
            let adapter = TextViewAdapter::new(&source);
            let selection = Selection::capture(from, from + 5, text.clone(), Space::Text)
                .ok()
                .flatten();
            (adapter, selection)
        })
        .bench_local_values(|(mut adapter, selection)| {
            if let Some(selection) = selection {
                let pending = PendingReplacement {
                    text: "replaced".to_string(),
                    selection,
                    document_id: DocumentId(1),
                };
                let _ = adapter.apply_replacement(&pending);
            }
            adapter
        });
}
