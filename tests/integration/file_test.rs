//! Integration tests for the file placement engine.

mod helpers;

use filevault_core::config::KeyLayout;
use filevault_core::error::ErrorKind;
use filevault_core::traits::storage::collect_stream;
use filevault_service::RequestContext;
use filevault_service::file::{DuplicateFileRequest, UpdateFileRequest, UploadRequest};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_upload_key_follows_folder_location() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("upload-keys").await;
    let reports = app.folder(bucket.id, None, "Reports").await;
    let year = app.folder(bucket.id, Some(reports.id), "2024").await;

    let file = app.upload(bucket.id, Some(year.id), "q1.pdf", b"quarterly").await;

    assert_eq!(file.folder_path.as_deref(), Some("Reports/2024"));
    assert_eq!(file.object_key, format!("Reports/2024/{}/q1.pdf", file.id));
    assert_eq!(file.size_bytes, 9);
    assert!(file.public_url.is_none());

    let stored = app
        .objects
        .object(&bucket.name, &file.object_key)
        .expect("object written");
    assert_eq!(&stored.data[..], b"quarterly");
    assert_eq!(stored.content_type, "application/pdf");
}

#[tokio::test]
async fn test_upload_at_root_and_name_only_layout() {
    let app = helpers::TestApp::with_layout(KeyLayout::NameOnly);
    let bucket = app.bucket("name-only").await;
    let docs = app.folder(bucket.id, None, "Docs").await;

    let root = app.upload(bucket.id, None, "readme.md", b"# hi").await;
    assert_eq!(root.object_key, "readme.md");
    assert!(root.folder_path.is_none());

    let nested = app.upload(bucket.id, Some(docs.id), "guide.md", b"text").await;
    assert_eq!(nested.object_key, "Docs/guide.md");
}

#[tokio::test]
async fn test_upload_sanitizes_name() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("sanitize").await;

    let file = app.upload(bucket.id, None, "a:b*c.txt", b"x").await;
    assert_eq!(file.name, "a_b_c.txt");
    assert_eq!(file.object_key, format!("{}/a_b_c.txt", file.id));
}

#[tokio::test]
async fn test_upload_of_dot_name_gets_fallback_key() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("dot-names").await;

    let file = app.upload(bucket.id, None, "..", b"x").await;
    assert_eq!(file.name, "unnamed");
    assert_eq!(file.object_key, format!("{}/unnamed", file.id));
    assert!(app.objects.object(&bucket.name, &file.object_key).is_some());
}

#[tokio::test]
async fn test_upload_rejects_empty_and_foreign_folder() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("upload-checks").await;
    let other = app.bucket("upload-other").await;
    let foreign = app.folder(other.id, None, "Elsewhere").await;

    let err = app
        .state
        .upload_service
        .upload(
            &app.ctx(),
            UploadRequest {
                bucket_id: bucket.id,
                folder_id: None,
                file_name: "empty.txt".to_string(),
                content_type: None,
                data: bytes::Bytes::new(),
                is_public: false,
            },
        )
        .await
        .expect_err("empty");
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .state
        .upload_service
        .upload(
            &app.ctx(),
            UploadRequest {
                bucket_id: bucket.id,
                folder_id: Some(foreign.id),
                file_name: "x.txt".to_string(),
                content_type: None,
                data: bytes::Bytes::from_static(b"x"),
                is_public: false,
            },
        )
        .await
        .expect_err("folder of another bucket");
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.objects.keys(&bucket.name).len(), 0);
}

#[tokio::test]
async fn test_move_to_same_folder_issues_no_object_calls() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("idempotent-move").await;
    let docs = app.folder(bucket.id, None, "Docs").await;
    let file = app.upload(bucket.id, Some(docs.id), "a.txt", b"abc").await;

    let before = app.objects.operation_count();
    let moved = app
        .state
        .file_service
        .move_file(&app.ctx(), file.id, Some(docs.id))
        .await
        .expect("noop move");

    assert_eq!(app.objects.operation_count(), before);
    assert_eq!(moved, file);
}

#[tokio::test]
async fn test_move_relocates_object() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("relocate").await;
    let inbox = app.folder(bucket.id, None, "Inbox").await;
    let archive = app.folder(bucket.id, None, "Archive").await;
    let file = app.upload(bucket.id, Some(inbox.id), "a.txt", b"abc").await;

    let moved = app
        .state
        .file_service
        .move_file(&app.ctx(), file.id, Some(archive.id))
        .await
        .expect("move");

    assert_eq!(moved.folder_id, Some(archive.id));
    assert_eq!(moved.folder_path.as_deref(), Some("Archive"));
    assert_eq!(moved.object_key, format!("Archive/{}/a.txt", file.id));
    assert_eq!(app.objects.keys(&bucket.name), vec![moved.object_key.clone()]);

    let moved = app
        .state
        .file_service
        .move_file(&app.ctx(), file.id, None)
        .await
        .expect("to root");
    assert_eq!(moved.folder_path, None);
    assert_eq!(moved.object_key, format!("{}/a.txt", file.id));
    assert_eq!(app.objects.keys(&bucket.name), vec![moved.object_key.clone()]);
}

#[tokio::test]
async fn test_failed_old_object_delete_does_not_fail_move() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("orphaned").await;
    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, None, "B").await;
    let file = app.upload(bucket.id, Some(a.id), "a.txt", b"abc").await;

    app.objects.set_fail_deletes(true);
    let moved = app
        .state
        .file_service
        .move_file(&app.ctx(), file.id, Some(b.id))
        .await
        .expect("move succeeds");

    let keys = app.objects.keys(&bucket.name);
    assert!(keys.contains(&file.object_key));
    assert!(keys.contains(&moved.object_key));
}

#[tokio::test]
async fn test_duplicate_naming_and_independence() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("duplicates").await;
    let docs = app.folder(bucket.id, None, "Docs").await;
    let file = app.upload(bucket.id, None, "report.pdf", b"data").await;

    let copy = app
        .state
        .file_service
        .duplicate_file(&app.ctx(), file.id, DuplicateFileRequest::default())
        .await
        .expect("duplicate");
    assert_ne!(copy.id, file.id);
    assert_eq!(copy.name, "report - Copy.pdf");
    assert_eq!(copy.folder_id, None);
    assert_eq!(copy.object_key, format!("{}/report - Copy.pdf", copy.id));
    assert_eq!(copy.size_bytes, 4);

    let named = app
        .state
        .file_service
        .duplicate_file(
            &app.ctx(),
            file.id,
            DuplicateFileRequest {
                target_folder_id: Some(docs.id),
                new_name: Some("summary".to_string()),
            },
        )
        .await
        .expect("duplicate into folder");
    assert_eq!(named.name, "summary.pdf");
    assert_eq!(named.object_key, format!("Docs/{}/summary.pdf", named.id));

    app.state
        .file_service
        .delete_file(&app.ctx(), file.id, true)
        .await
        .expect("hard delete source");
    assert!(app.objects.object(&bucket.name, &copy.object_key).is_some());
    assert!(app.objects.object(&bucket.name, &file.object_key).is_none());
}

#[tokio::test]
async fn test_duplicate_sanitizes_requested_name() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("duplicate-names").await;
    let file = app.upload(bucket.id, None, "report.pdf", b"data").await;

    let copy = app
        .state
        .file_service
        .duplicate_file(
            &app.ctx(),
            file.id,
            DuplicateFileRequest {
                target_folder_id: None,
                new_name: Some("a:b/c".to_string()),
            },
        )
        .await
        .expect("duplicate");
    assert_eq!(copy.name, "a_b_c.pdf");
    assert_eq!(copy.object_key, format!("{}/a_b_c.pdf", copy.id));
    assert_eq!(copy.expected_key(), copy.object_key);
}

#[tokio::test]
async fn test_update_rename_and_visibility() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("patching").await;
    let docs = app.folder(bucket.id, None, "Docs").await;
    let file = app.upload(bucket.id, None, "draft.txt", b"v1").await;

    let updated = app
        .state
        .file_service
        .update_file(
            &app.ctx(),
            file.id,
            UpdateFileRequest {
                name: Some("final.txt".to_string()),
                folder_id: Some(docs.id),
                is_public: Some(true),
            },
        )
        .await
        .expect("patch");

    assert_eq!(updated.name, "final.txt");
    assert_eq!(updated.object_key, format!("Docs/{}/final.txt", file.id));
    assert!(updated.is_public);
    let url = updated.public_url.as_deref().expect("public url");
    assert!(url.ends_with(&updated.object_key));

    let stored = app
        .objects
        .object(&bucket.name, &updated.object_key)
        .expect("relocated");
    assert!(stored.is_public);
    assert!(app.objects.object(&bucket.name, &file.object_key).is_none());

    let private = app
        .state
        .file_service
        .update_file(
            &app.ctx(),
            file.id,
            UpdateFileRequest {
                is_public: Some(false),
                ..UpdateFileRequest::default()
            },
        )
        .await
        .expect("make private");
    assert!(private.public_url.is_none());
    assert_eq!(private.object_key, updated.object_key);
}

#[tokio::test]
async fn test_soft_delete_and_restore() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("restore").await;
    let file = app.upload(bucket.id, None, "a.txt", b"abc").await;

    let err = app
        .state
        .file_service
        .restore_file(&app.ctx(), file.id)
        .await
        .expect_err("not deleted");
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.state
        .file_service
        .delete_file(&app.ctx(), file.id, false)
        .await
        .expect("soft delete");
    let err = app
        .state
        .file_service
        .get_file(&app.ctx(), file.id)
        .await
        .expect_err("hidden");
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.objects.object(&bucket.name, &file.object_key).is_some());

    let restored = app
        .state
        .file_service
        .restore_file(&app.ctx(), file.id)
        .await
        .expect("restore");
    assert!(restored.is_active());
    assert_eq!(restored.object_key, file.object_key);
}

#[tokio::test]
async fn test_hard_delete_survives_object_failure() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("hard-delete").await;
    let file = app.upload(bucket.id, None, "a.txt", b"abc").await;

    app.objects.set_fail_deletes(true);
    app.state
        .file_service
        .delete_file(&app.ctx(), file.id, true)
        .await
        .expect("hard delete");

    assert_eq!(app.metadata.file_count(), 0);
    let err = app
        .state
        .file_service
        .restore_file(&app.ctx(), file.id)
        .await
        .expect_err("record gone");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_download_stream_and_link() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("downloads").await;
    let file = app.upload(bucket.id, None, "a.txt", b"content").await;

    let result = app
        .state
        .download_service
        .download(&app.ctx(), file.id)
        .await
        .expect("download");
    let data = collect_stream(result.stream).await.expect("read");
    assert_eq!(&data[..], b"content");

    let link = app
        .state
        .download_service
        .download_url(&app.ctx(), file.id)
        .await
        .expect("link");
    assert_eq!(link.file_name, "a.txt");
    assert!(link.url.ends_with(&file.object_key));
    assert!(link.expires_at > file.created_at);
}

#[tokio::test]
async fn test_cancelled_request_writes_nothing() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("cancelled").await;

    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::with_cancel(app.tenant_id, app.user_id, token);

    let err = app
        .state
        .upload_service
        .upload(
            &ctx,
            UploadRequest {
                bucket_id: bucket.id,
                folder_id: None,
                file_name: "a.txt".to_string(),
                content_type: None,
                data: bytes::Bytes::from_static(b"abc"),
                is_public: false,
            },
        )
        .await
        .expect_err("cancelled");
    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert_eq!(app.objects.keys(&bucket.name).len(), 0);
    assert_eq!(app.metadata.file_count(), 0);
}
