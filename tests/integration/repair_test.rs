//! Integration tests for stale paths and the explicit backfill.

mod helpers;

use filevault_core::types::FolderId;
use filevault_database::repositories::FolderRepository;
use filevault_entity::Folder;
use filevault_service::folder::UpdateFolderRequest;

#[tokio::test]
async fn test_rename_does_not_cascade_until_backfill() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("backfill").await;
    let reports = app.folder(bucket.id, None, "Reports").await;
    let year = app.folder(bucket.id, Some(reports.id), "2024").await;
    let file = app.upload(bucket.id, Some(year.id), "q1.pdf", b"pdf").await;
    assert_eq!(file.object_key, format!("Reports/2024/{}/q1.pdf", file.id));

    app.state
        .folder_service
        .update_folder(
            &app.ctx(),
            reports.id,
            UpdateFolderRequest {
                name: Some("Archive".to_string()),
                is_public: None,
            },
        )
        .await
        .expect("rename");

    // Descendants keep their old path.
    let stale = app
        .state
        .folder_service
        .get_folder(&app.ctx(), year.id)
        .await
        .expect("get");
    assert_eq!(stale.path, "Reports");
    let stale_file = app
        .state
        .file_service
        .get_file(&app.ctx(), file.id)
        .await
        .expect("get file");
    assert_eq!(stale_file.folder_path.as_deref(), Some("Reports/2024"));

    let report = app
        .state
        .repair_service
        .backfill(&app.ctx(), bucket.id, false)
        .await
        .expect("backfill");
    assert_eq!(report.folders_scanned, 2);
    assert_eq!(report.folders_updated, 1);
    assert_eq!(report.files_updated, 1);
    assert_eq!(report.objects_relocated, 0);
    assert!(report.orphans.is_empty());

    let fixed = app
        .state
        .file_service
        .get_file(&app.ctx(), file.id)
        .await
        .expect("get file");
    assert_eq!(fixed.folder_path.as_deref(), Some("Archive/2024"));
    assert_eq!(fixed.object_key, file.object_key);

    let report = app
        .state
        .repair_service
        .backfill(&app.ctx(), bucket.id, true)
        .await
        .expect("relocating backfill");
    assert_eq!(report.folders_updated, 0);
    assert_eq!(report.objects_relocated, 1);

    let relocated = app
        .state
        .file_service
        .get_file(&app.ctx(), file.id)
        .await
        .expect("get file");
    assert_eq!(relocated.object_key, format!("Archive/2024/{}/q1.pdf", file.id));
    assert_eq!(app.objects.keys(&bucket.name), vec![relocated.object_key.clone()]);

    let report = app
        .state
        .repair_service
        .backfill(&app.ctx(), bucket.id, true)
        .await
        .expect("second run");
    assert_eq!(report.folders_updated, 0);
    assert_eq!(report.files_updated, 0);
    assert_eq!(report.objects_relocated, 0);
}

#[tokio::test]
async fn test_moved_subtree_is_repaired() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("moved-subtree").await;
    let a = app.folder(bucket.id, None, "A").await;
    let b = app.folder(bucket.id, Some(a.id), "B").await;
    let c = app.folder(bucket.id, Some(b.id), "C").await;
    let target = app.folder(bucket.id, None, "Target").await;

    app.state
        .folder_service
        .move_folder(&app.ctx(), b.id, Some(target.id))
        .await
        .expect("move");

    let child = app
        .state
        .folder_service
        .get_folder(&app.ctx(), c.id)
        .await
        .expect("get");
    assert_eq!(child.path, "A/B");

    app.state
        .repair_service
        .backfill(&app.ctx(), bucket.id, false)
        .await
        .expect("backfill");

    let child = app
        .state
        .folder_service
        .get_folder(&app.ctx(), c.id)
        .await
        .expect("get");
    assert_eq!(child.path, "Target/B");
    assert_eq!(child.breadcrumbs(), vec!["Target", "B", "C"]);
}

#[tokio::test]
async fn test_orphans_are_reported_and_left_alone() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("orphans").await;
    app.folder(bucket.id, None, "Root").await;

    let orphan = Folder::new(
        app.tenant_id,
        bucket.id,
        Some(FolderId::new()),
        "Lost",
        "Gone",
        false,
        app.user_id,
    );
    FolderRepository::save(&app.metadata, &orphan)
        .await
        .expect("insert orphan");

    let report = app
        .state
        .repair_service
        .backfill(&app.ctx(), bucket.id, false)
        .await
        .expect("backfill");
    assert_eq!(report.folders_scanned, 1);
    assert_eq!(report.orphans, vec![orphan.id]);

    let untouched = FolderRepository::find_by_id(&app.metadata, orphan.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(untouched.path, "Gone");
}
