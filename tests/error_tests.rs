//! Integration tests for error handling.
//!
//! Tests that errors are properly returned for invalid input.

mod common;

use braid::source;
use braid::{
    Commit, CommitStore, ConfigFile, GraphBuilder, LayoutOptions, StoreError, ValidationError, bind_children, compute,
};
use common::TestEnv;
use std::io::Cursor;
use tempfile::TempDir;

fn store_error(err: &eyre::Report) -> &StoreError {
    err.downcast_ref::<StoreError>()
        .unwrap_or_else(|| panic!("Expected a StoreError, got: {:#}", err))
}

// =============================================================================
// Unknown Commit Tests
// =============================================================================

#[test]
fn test_unknown_head_fails() {
    let store = GraphBuilder::new().root("A").build().unwrap();

    let err = store.resolve(&["A", "nope"]).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::NotFound(id) if id == "nope"));
}

#[test]
fn test_unknown_parent_fails_layout() {
    let mut store = GraphBuilder::new().commit("A", ["B"]).commit("B", ["ghost"]).build().unwrap();
    let heads = store.resolve(&["A"]).unwrap();

    let err = compute(&mut store, &heads, &LayoutOptions::default()).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::NotFound(id) if id == "ghost"));
}

#[test]
fn test_unknown_parent_message_names_child() {
    let mut store = GraphBuilder::new().commit("A", ["ghost"]).build().unwrap();
    let heads = store.resolve(&["A"]).unwrap();
    let mut pass = store.pass_state();

    let err = bind_children(&mut store, &mut pass, &heads).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("A"), "message: {}", message);
    assert!(message.contains("ghost"), "message: {}", message);
}

#[test]
fn test_get_unknown_returns_none() {
    let env = TestEnv::diamond();
    assert!(env.store.get("Z").is_none());
}

// =============================================================================
// Cycle Tests
// =============================================================================

#[test]
fn test_cycle_is_reported() {
    let mut env = TestEnv::new(
        GraphBuilder::new().commit("H", ["A"]).commit("A", ["B"]).commit("B", ["A"]),
        &["H"],
    );

    let err = compute(&mut env.store, &env.heads, &LayoutOptions::default()).unwrap_err();
    match store_error(&err) {
        StoreError::CycleDetected { unplaced } => assert_eq!(unplaced, &vec!["A".to_string()]),
        other => panic!("Expected CycleDetected, got {:?}", other),
    }
}

#[test]
fn test_cycle_is_reported_when_mingled() {
    let mut env = TestEnv::new(
        GraphBuilder::new().commit("H", ["A"]).commit("A", ["B"]).commit("B", ["A"]),
        &["H"],
    );

    let err = compute(&mut env.store, &env.heads, &LayoutOptions::default().mingle(true)).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::CycleDetected { .. }));
}

#[test]
fn test_cycle_without_heads_has_no_heads() {
    let store = GraphBuilder::new().commit("A", ["B"]).commit("B", ["A"]).build().unwrap();
    assert!(store.heads().is_empty());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_duplicate_id_rejected() {
    let err = CommitStore::from_commits([Commit::new("A", ["B"]), Commit::new("A", Vec::<String>::new())])
        .unwrap_err();
    assert!(matches!(store_error(&err), StoreError::DuplicateId(id) if id == "A"));
}

#[test]
fn test_self_parent_rejected() {
    let err = GraphBuilder::new().commit("A", ["A"]).build().unwrap_err();
    assert!(matches!(
        store_error(&err),
        StoreError::Validation(ValidationError::SelfParent(id)) if id == "A"
    ));
}

#[test]
fn test_duplicate_parent_rejected() {
    let err = GraphBuilder::new().commit("A", ["B", "B"]).root("B").build().unwrap_err();
    assert!(matches!(
        store_error(&err),
        StoreError::Validation(ValidationError::DuplicateParent(id)) if id == "B"
    ));
}

#[test]
fn test_empty_id_rejected() {
    let mut store = CommitStore::new();
    let err = store.insert(Commit::new("", Vec::<String>::new())).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::Validation(ValidationError::EmptyId)));
}

#[test]
fn test_whitespace_in_id_rejected() {
    let mut store = CommitStore::new();
    let err = store.insert(Commit::new("a b", Vec::<String>::new())).unwrap_err();
    assert!(matches!(
        store_error(&err),
        StoreError::Validation(ValidationError::InvalidCharacters(_))
    ));
}

// =============================================================================
// Input Tests
// =============================================================================

#[test]
fn test_jsonl_bad_lines_are_skipped() {
    let input = "{\"id\":\"a\",\"parents\":[\"b\"]}\n{broken\n{\"id\":\"\"}\n{\"id\":\"b\"}\n";
    let commits = source::read_jsonl(Cursor::new(input)).unwrap();

    let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_jsonl_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = source::load_jsonl(&temp_dir.path().join("missing.jsonl")).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.jsonl"));
}

#[test]
fn test_git_log_outside_repository_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(source::git_log(temp_dir.path(), &[], None).is_err());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_bad_value_fails() {
    assert!(ConfigFile::parse("mingle: sometimes\n").is_err());
}

#[test]
fn test_config_unknown_key_fails() {
    assert!(ConfigFile::parse("colour: false\n").is_err());
}

#[test]
fn test_config_load_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "flip: [1, 2]\n").unwrap();

    let err = ConfigFile::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.yaml"));
}
