//! Integration tests for the folder hierarchy engine.

mod helpers;

use filevault_core::error::ErrorKind;
use filevault_service::folder::{TreeQuery, UpdateFolderRequest};

#[tokio::test]
async fn test_nested_paths_follow_parent_chain() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("nested-paths").await;

    let reports = app.folder(bucket.id, None, "Reports").await;
    let year = app.folder(bucket.id, Some(reports.id), "2024").await;
    let quarter = app.folder(bucket.id, Some(year.id), "Q1").await;

    assert_eq!(reports.path, "");
    assert_eq!(year.path, "Reports");
    assert_eq!(quarter.path, "Reports/2024");
    assert_eq!(quarter.full_location(), "Reports/2024/Q1");
    assert_eq!(quarter.breadcrumbs(), vec!["Reports", "2024", "Q1"]);
}

#[tokio::test]
async fn test_folders_never_touch_object_store() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("no-objects").await;
    let before = app.objects.operation_count();

    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, None, "B").await;
    app.state
        .folder_service
        .move_folder(&app.ctx(), a.id, Some(b.id))
        .await
        .expect("move");
    app.state
        .folder_service
        .delete_folder(&app.ctx(), a.id)
        .await
        .expect("delete");

    assert_eq!(app.objects.operation_count(), before);
}

#[tokio::test]
async fn test_sibling_name_conflict() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("sibling-names").await;
    let parent = app.folder(bucket.id, None, "Parent").await;
    app.folder(bucket.id, Some(parent.id), "Docs").await;

    let err = app
        .state
        .folder_service
        .create_folder(
            &app.ctx(),
            filevault_service::folder::CreateFolderRequest {
                bucket_id: bucket.id,
                parent_id: Some(parent.id),
                name: "Docs".to_string(),
                is_public: false,
            },
        )
        .await
        .expect_err("duplicate sibling");
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Same name under a different parent is fine.
    let other = app.folder(bucket.id, None, "Other").await;
    app.folder(bucket.id, Some(other.id), "Docs").await;
}

#[tokio::test]
async fn test_rename_to_taken_name_conflicts() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("rename-taken").await;
    app.folder(bucket.id, None, "Alpha").await;
    let beta = app.folder(bucket.id, None, "Beta").await;

    let err = app
        .state
        .folder_service
        .update_folder(
            &app.ctx(),
            beta.id,
            UpdateFolderRequest {
                name: Some("Alpha".to_string()),
                is_public: None,
            },
        )
        .await
        .expect_err("taken");
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Renaming to its own name is not a collision.
    let same = app
        .state
        .folder_service
        .update_folder(
            &app.ctx(),
            beta.id,
            UpdateFolderRequest {
                name: Some("Beta".to_string()),
                is_public: Some(true),
            },
        )
        .await
        .expect("same name");
    assert!(same.is_public);
}

#[tokio::test]
async fn test_invalid_folder_name_rejected() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("bad-names").await;

    let err = app
        .state
        .folder_service
        .create_folder(
            &app.ctx(),
            filevault_service::folder::CreateFolderRequest {
                bucket_id: bucket.id,
                parent_id: None,
                name: "a/b".to_string(),
                is_public: false,
            },
        )
        .await
        .expect_err("slash");
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_move_into_self_or_descendant_rejected() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("cycles").await;
    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, Some(a.id), "B").await;
    let c = app.folder(bucket.id, Some(b.id), "C").await;

    let err = app
        .state
        .folder_service
        .move_folder(&app.ctx(), a.id, Some(a.id))
        .await
        .expect_err("self");
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = app
        .state
        .folder_service
        .move_folder(&app.ctx(), a.id, Some(c.id))
        .await
        .expect_err("descendant");
    assert_eq!(err.kind, ErrorKind::Conflict);

    let unchanged = app
        .state
        .folder_service
        .get_folder(&app.ctx(), a.id)
        .await
        .expect("get");
    assert!(unchanged.parent_id.is_none());
}

#[tokio::test]
async fn test_move_to_current_parent_is_noop() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("noop-move").await;
    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, Some(a.id), "B").await;

    let moved = app
        .state
        .folder_service
        .move_folder(&app.ctx(), b.id, Some(a.id))
        .await
        .expect("noop");
    assert_eq!(moved.parent_id, Some(a.id));
    assert_eq!(moved.path, vec!["A", "B"]);

    let stored = app
        .state
        .folder_service
        .get_folder(&app.ctx(), b.id)
        .await
        .expect("get");
    assert_eq!(stored.updated_at, b.updated_at);
}

#[tokio::test]
async fn test_move_to_root_and_back() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("root-moves").await;
    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, Some(a.id), "B").await;

    let moved = app
        .state
        .folder_service
        .move_folder(&app.ctx(), b.id, None)
        .await
        .expect("to root");
    assert_eq!(moved.parent_id, None);
    assert_eq!(moved.path, vec!["B"]);

    let moved = app
        .state
        .folder_service
        .move_folder(&app.ctx(), b.id, Some(a.id))
        .await
        .expect("back");
    assert_eq!(moved.path, vec!["A", "B"]);
}

#[tokio::test]
async fn test_delete_blocked_by_subfolders_not_files() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("delete-rules").await;
    let parent = app.folder(bucket.id, None, "Parent").await;
    let child = app.folder(bucket.id, Some(parent.id), "Child").await;
    app.upload(bucket.id, Some(parent.id), "notes.txt", b"hello").await;

    let err = app
        .state
        .folder_service
        .delete_folder(&app.ctx(), parent.id)
        .await
        .expect_err("has subfolder");
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.state
        .folder_service
        .delete_folder(&app.ctx(), child.id)
        .await
        .expect("delete child");
    app.state
        .folder_service
        .delete_folder(&app.ctx(), parent.id)
        .await
        .expect("files do not block");

    let err = app
        .state
        .folder_service
        .get_folder(&app.ctx(), parent.id)
        .await
        .expect_err("deleted");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_tree_counts_and_depth() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("tree-counts").await;
    let reports = app.folder(bucket.id, None, "Reports").await;
    let year = app.folder(bucket.id, Some(reports.id), "2024").await;
    app.folder(bucket.id, None, "Empty").await;
    app.upload(bucket.id, Some(reports.id), "a.pdf", b"12345").await;
    app.upload(bucket.id, Some(reports.id), "b.pdf", b"123").await;
    app.upload(bucket.id, Some(year.id), "c.pdf", b"1").await;

    let tree = app
        .state
        .tree_service
        .list_tree(
            &app.ctx(),
            TreeQuery {
                parent_id: None,
                depth: 2,
                include_empty: true,
            },
        )
        .await
        .expect("tree");

    let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Empty", "Reports"]);

    let node = &tree[1];
    assert_eq!(node.file_count, 2);
    assert_eq!(node.total_size, 8);
    assert_eq!(node.folder_count, 1);
    assert_eq!(node.children.len(), 1);
    assert_eq!(node.children[0].path, vec!["Reports", "2024"]);
    assert_eq!(node.children[0].depth, 1);
    assert!(node.children[0].children.is_empty());

    let tree = app
        .state
        .tree_service
        .list_tree(
            &app.ctx(),
            TreeQuery {
                parent_id: None,
                depth: 1,
                include_empty: false,
            },
        )
        .await
        .expect("tree");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "Reports");
    assert!(tree[0].children.is_empty());
}

#[tokio::test]
async fn test_tree_under_missing_parent_not_found() {
    let app = helpers::TestApp::new();

    let err = app
        .state
        .tree_service
        .list_tree(
            &app.ctx(),
            TreeQuery {
                parent_id: Some(filevault_core::types::FolderId::new()),
                ..TreeQuery::default()
            },
        )
        .await
        .expect_err("missing parent");
    assert_eq!(err.kind, ErrorKind::NotFound);
}
