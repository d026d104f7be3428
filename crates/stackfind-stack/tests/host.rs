//! Integration tests for the in-memory host: stack files on disk and change notifications.

#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::PathBuf};

use stackfind_stack::{
    ActiveDocument, ChangeFeed, DocumentKey, LayerStack, MemoryHost, NameEditor, NodeKind,
    StackError,
};
use tempfile::TempDir;

/// A document with a scalar name, a locked layer, a group, and an empty mask.
const STACK_YAML: &str = "\
active: 0
documents:
  - material: Rock
    layers:
      - name: 2024
      - name: Base
        locked: true
        mask: []
      - name: Dirt
        kind: folder
        children:
          - name: Grime
            effects:
              - name: Grime Blur
  - material: Rock
    stack: Detail
    layers:
      - name: Chips
";

/// Writes the fixture to a temp dir.
fn write_stack() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stack.yaml");
    fs::write(&path, STACK_YAML).unwrap();
    (dir, path)
}

#[test]
fn load_rename_save_reload() {
    let (_dir, path) = write_stack();
    let mut host = MemoryHost::load(&path).unwrap();

    let grime = host.find_node("Grime").unwrap();
    host.set_node_name(&grime, "Grime Heavy").unwrap();
    host.save(&path).unwrap();

    let reloaded = MemoryHost::load(&path).unwrap();
    assert!(reloaded.find_node("Grime Heavy").is_some());
    assert!(reloaded.find_node("Grime Blur").is_some());

    let base = reloaded.find_node("Base").unwrap();
    assert!(reloaded.has_mask(&base).unwrap());
    assert!(reloaded.mask_effects(&base).unwrap().is_empty());

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("name: 2024"));
    assert!(saved.contains("locked: true"));
    assert!(saved.contains("kind: folder"));
}

#[test]
fn scalar_names_read_as_text() {
    let (_dir, path) = write_stack();
    let host = MemoryHost::load(&path).unwrap();

    let roots = host.root_nodes().unwrap();
    assert_eq!(host.node_name(&roots[0]).unwrap(), "2024");
    assert_eq!(host.node_kind(&roots[2]).unwrap(), NodeKind::Group);
}

#[test]
fn locked_nodes_stay_unchanged_on_disk() {
    let (_dir, path) = write_stack();
    let mut host = MemoryHost::load(&path).unwrap();

    let base = host.find_node("Base").unwrap();
    assert!(host.set_node_name(&base, "Rock").is_err());
    host.save(&path).unwrap();

    let reloaded = MemoryHost::load(&path).unwrap();
    assert!(reloaded.find_node("Base").is_some());
}

#[test]
fn documents_share_a_material() {
    let (_dir, path) = write_stack();
    let mut host = MemoryHost::load(&path).unwrap();

    assert_eq!(host.active_document_key(), Some(DocumentKey::new("Rock", None)));
    host.open_document(1).unwrap();
    assert_eq!(
        host.active_document_key(),
        Some(DocumentKey::new("Rock", Some("Detail".into())))
    );
    assert!(host.find_node("Grime").is_none());
    assert!(host.find_node("Chips").is_some());
}

#[test]
fn every_edit_notifies_subscribers() {
    let (_dir, path) = write_stack();
    let mut host = MemoryHost::load(&path).unwrap();
    let subscription = host.subscribe();

    let grime = host.find_node("Grime").unwrap();
    host.set_node_name(&grime, "Soot").unwrap();
    host.open_document(1).unwrap();
    host.close_document();

    let latest = subscription.drain().unwrap();
    assert_eq!(latest.seq, 2);
    assert!(subscription.drain().is_none());
    assert!(!host.is_document_open());

    host.unsubscribe(&subscription);
    assert_eq!(host.subscriber_count(), 0);
}

#[test]
fn closed_file_starts_without_a_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closed.yaml");
    fs::write(&path, format!("closed: true\n{}", STACK_YAML.trim_start_matches("active: 0\n")))
        .unwrap();

    let host = MemoryHost::load(&path).unwrap();
    assert!(!host.is_document_open());
    assert!(host.root_nodes().unwrap().is_empty());
    assert!(host.outline().is_empty());
}

#[test]
fn missing_and_malformed_files_fail() {
    let dir = tempfile::tempdir().unwrap();

    let missing = MemoryHost::load(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(missing, StackError::ReadFile { .. }));

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "documents: [material: {\n").unwrap();
    let err = MemoryHost::load(&bad).unwrap_err();
    assert!(matches!(err, StackError::Parse { .. }));
    assert!(err.to_string().contains("bad.yaml"));
}

#[test]
fn shared_uids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uids.yaml");
    fs::write(
        &path,
        "\
documents:
  - material: Rock
    layers:
      - name: Wear
        uid: 7
        effects:
          - name: Wear Blur
            uid: 7
",
    )
    .unwrap();

    let err = MemoryHost::load(&path).unwrap_err();
    assert!(matches!(err, StackError::DuplicateUid { uid: 7 }));

    fs::write(
        &path,
        "\
documents:
  - material: Rock
    layers:
      - name: Wear
        uid: 7
        effects:
          - name: Wear Blur
            uid: 8
",
    )
    .unwrap();
    let host = MemoryHost::load(&path).unwrap();
    let blur = host.find_node("Wear Blur").unwrap();
    assert_eq!(host.node_uid(&blur), Some(8));
}
