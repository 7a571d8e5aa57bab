// Unit tests for domain models

use crate::domain::model::*;
use crate::error::CopyError;

#[test]
fn test_copy_request_new() {
    let request = CopyRequest::new("src-1", "dst-1").unwrap();
    assert_eq!(request.src_id, "src-1");
    assert_eq!(request.dst_id, "dst-1");
    assert!(request.new_name.is_none());
    assert!(!request.include_trashed);
    assert!(!request.dry_run);
}

#[test]
fn test_copy_request_rejects_empty_ids() {
    assert!(matches!(
        CopyRequest::new("", "dst-1"),
        Err(CopyError::BadArgs(_))
    ));
    assert!(matches!(
        CopyRequest::new("src-1", "  "),
        Err(CopyError::BadArgs(_))
    ));
}

#[test]
fn test_copy_request_builders() {
    let request = CopyRequest::new("src-1", "dst-1")
        .unwrap()
        .with_new_name(Some("Backup".to_string()))
        .include_trashed(true)
        .dry_run(true);
    assert_eq!(request.new_name.as_deref(), Some("Backup"));
    assert!(request.include_trashed);
    assert!(request.dry_run);
}

#[test]
fn test_item_kind_display() {
    assert_eq!(ItemKind::Folder.to_string(), "folder");
    assert_eq!(ItemKind::File.to_string(), "file");
}

#[test]
fn test_remote_item_is_folder() {
    let folder = RemoteItem {
        id: "a".to_string(),
        name: "A".to_string(),
        kind: ItemKind::Folder,
        parent: None,
    };
    let file = RemoteItem {
        id: "b".to_string(),
        name: "b.txt".to_string(),
        kind: ItemKind::File,
        parent: Some("a".to_string()),
    };
    assert!(folder.is_folder());
    assert!(!file.is_folder());
}

#[test]
fn test_planned_op_display() {
    let op = PlannedOp {
        kind: OpKind::CopyFile,
        source_id: "f1".to_string(),
        target_parent_id: Some("p1".to_string()),
        target_name: "notes.txt".to_string(),
        source_path: "/A/notes.txt".to_string(),
        target_path: "/P/A/notes.txt".to_string(),
    };
    assert_eq!(op.to_string(), "copy-file /A/notes.txt -> /P/A/notes.txt");

    let op = PlannedOp {
        kind: OpKind::CreateFolder,
        source_id: "a".to_string(),
        target_parent_id: None,
        target_name: "A".to_string(),
        source_path: "/A".to_string(),
        target_path: "/P/A".to_string(),
    };
    assert_eq!(op.to_string(), "create-folder /A -> /P/A");
}
