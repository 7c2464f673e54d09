//! Integration tests for tenant isolation.

mod helpers;

use filevault_core::error::ErrorKind;
use filevault_service::bucket::CreateBucketRequest;
use filevault_service::folder::{CreateFolderRequest, TreeQuery};

#[tokio::test]
async fn test_foreign_folder_and_file_are_forbidden() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("tenant-a").await;
    let folder = app.folder(bucket.id, None, "Private").await;
    let file = app.upload(bucket.id, Some(folder.id), "secret.txt", b"s").await;
    let intruder = app.other_ctx();

    let err = app
        .state
        .folder_service
        .get_folder(&intruder, folder.id)
        .await
        .expect_err("folder");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .state
        .file_service
        .get_file(&intruder, file.id)
        .await
        .expect_err("file");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .state
        .download_service
        .download(&intruder, file.id)
        .await
        .expect_err("download");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .state
        .file_service
        .delete_file(&intruder, file.id, true)
        .await
        .expect_err("delete");
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(app.objects.object(&bucket.name, &file.object_key).is_some());
}

#[tokio::test]
async fn test_cannot_place_into_foreign_folder() {
    let app = helpers::TestApp::new();
    let theirs = app.bucket("tenant-b").await;
    let their_folder = app.folder(theirs.id, None, "Shared").await;

    let intruder = app.other_ctx();
    let err = app
        .state
        .folder_service
        .create_folder(
            &intruder,
            CreateFolderRequest {
                bucket_id: theirs.id,
                parent_id: Some(their_folder.id),
                name: "Sneaky".to_string(),
                is_public: false,
            },
        )
        .await
        .expect_err("foreign bucket");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let own = app
        .state
        .bucket_service
        .create_bucket(
            &intruder,
            CreateBucketRequest {
                name: "intruder-bucket".to_string(),
                is_public: false,
                region: None,
            },
        )
        .await
        .expect("own bucket");
    let err = app
        .state
        .folder_service
        .list_by_bucket(&intruder, theirs.id)
        .await
        .expect_err("list foreign bucket");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let listed = app
        .state
        .folder_service
        .list_by_bucket(&intruder, own.id)
        .await
        .expect("own bucket listing");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_tree_only_lists_own_tenant() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("tree-tenant").await;
    app.folder(bucket.id, None, "Mine").await;

    let tree = app
        .state
        .tree_service
        .list_tree(&app.other_ctx(), TreeQuery::default())
        .await
        .expect("tree");
    assert!(tree.is_empty());

    let tree = app
        .state
        .tree_service
        .list_tree(&app.ctx(), TreeQuery::default())
        .await
        .expect("tree");
    assert_eq!(tree.len(), 1);
}

#[tokio::test]
async fn test_bucket_names_are_global() {
    let app = helpers::TestApp::new();
    app.bucket("taken-name").await;

    let err = app
        .state
        .bucket_service
        .create_bucket(
            &app.other_ctx(),
            CreateBucketRequest {
                name: "taken-name".to_string(),
                is_public: false,
                region: None,
            },
        )
        .await
        .expect_err("duplicate name");
    assert_eq!(err.kind, ErrorKind::Conflict);
}
