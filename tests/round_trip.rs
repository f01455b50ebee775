use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tdx::model::config::ParseOptions;
use tdx::ops::item_ops;
use tdx::parse::{parse_document, serialize_document};

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

/// Parse, serialize, and assert byte-for-byte equality
fn assert_round_trip(source: &str, label: &str) {
    let opts = ParseOptions::default();
    let (doc, warning) = parse_document(source, &opts);
    assert!(warning.is_none(), "unexpected warning for {}: {:?}", label, warning);
    let output = serialize_document(&doc, &opts);
    assert_eq!(output, source, "Round-trip failed for: {}", label);
}

// ============================================================================
// Verbatim round trips
// ============================================================================

#[test]
fn round_trip_simple() {
    assert_round_trip(&load_fixture("simple.md"), "simple.md");
}

#[test]
fn round_trip_full_document() {
    assert_round_trip(&load_fixture("full.md"), "full.md");
}

#[test]
fn round_trip_no_final_newline() {
    assert_round_trip(&load_fixture("no_final_newline.md"), "no_final_newline.md");
}

#[test]
fn round_trip_crlf() {
    let source = load_fixture("full.md").replace('\n', "\r\n");
    assert_round_trip(&source, "full.md (CRLF)");
}

#[test]
fn round_trip_is_idempotent() {
    let opts = ParseOptions::default();
    let source = load_fixture("full.md");
    let (doc, _) = parse_document(&source, &opts);
    let once = serialize_document(&doc, &opts);
    let (doc, _) = parse_document(&once, &opts);
    assert_eq!(serialize_document(&doc, &opts), once);
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn simple_has_two_items() {
    let (doc, _) = parse_document(&load_fixture("simple.md"), &ParseOptions::default());
    assert_eq!(doc.len(), 2);
    assert!(!doc.item(0).unwrap().checked);
    assert!(doc.item(1).unwrap().checked);
}

#[test]
fn fenced_and_quoted_checkboxes_are_not_items() {
    let (doc, _) = parse_document(&load_fixture("full.md"), &ParseOptions::default());
    assert!(doc.items().all(|i| !i.markdown().contains("fake checkbox")));
    assert!(doc.items().all(|i| !i.markdown().contains("quoted")));

    let first = doc.item(0).unwrap();
    assert_eq!(first.markdown(), "Ship the parser #core !p1 @due(2025-03-01)");
    assert_eq!(first.tags, vec!["core"]);
    assert_eq!(first.priority, Some(1));
    assert_eq!(doc.item(1).unwrap().depth, 1);
    assert!(doc.item(3).unwrap().checked);
}

#[test]
fn frontmatter_is_read() {
    let (doc, _) = parse_document(&load_fixture("full.md"), &ParseOptions::default());
    assert!(doc.metadata.show_headings_or(false));
    assert!(!doc.metadata.filter_done_or(true));
}

// ============================================================================
// Mutations touch only their own lines
// ============================================================================

#[test]
fn toggle_rewrites_one_line() {
    let opts = ParseOptions::default();
    let source = load_fixture("full.md");
    let (mut doc, _) = parse_document(&source, &opts);
    item_ops::toggle_item(&mut doc, 0).unwrap();
    assert_eq!(
        serialize_document(&doc, &opts),
        source.replacen("- [ ] Ship the parser", "- [x] Ship the parser", 1)
    );
}

#[test]
fn add_then_delete_restores_source() {
    let opts = ParseOptions::default();
    let source = load_fixture("simple.md");
    let (mut doc, _) = parse_document(&source, &opts);
    let index = item_ops::add_item(&mut doc, "C");
    assert_eq!(serialize_document(&doc, &opts), format!("{}- [ ] C\n", source));
    item_ops::delete_item(&mut doc, index, &opts).unwrap();
    assert_eq!(serialize_document(&doc, &opts), source);
}

#[test]
fn crlf_is_kept_for_new_lines() {
    let opts = ParseOptions::default();
    let (mut doc, _) = parse_document("- [ ] a\r\n", &opts);
    item_ops::add_item(&mut doc, "b");
    assert_eq!(serialize_document(&doc, &opts), "- [ ] a\r\n- [ ] b\r\n");
}
