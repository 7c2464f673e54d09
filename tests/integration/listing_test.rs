//! Integration tests for tenant-wide and per-bucket file listings.

mod helpers;

use filevault_core::error::ErrorKind;
use chrono::{DateTime, Duration, Utc};
use filevault_service::file::{FileListing, FileQuery, FileSortField, SortOrder};

#[tokio::test]
async fn test_bucket_listing_spans_folders() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("bucket-listing").await;
    let other = app.bucket("bucket-listing-other").await;
    let docs = app.folder(bucket.id, None, "Docs").await;
    let deep = app.folder(bucket.id, Some(docs.id), "Deep").await;

    app.upload(bucket.id, None, "z-root.pdf", b"1").await;
    app.upload(bucket.id, Some(docs.id), "b.pdf", b"2").await;
    app.upload(bucket.id, Some(docs.id), "a.pdf", b"3").await;
    app.upload(bucket.id, Some(deep.id), "c.pdf", b"4").await;
    app.upload(other.id, None, "elsewhere.pdf", b"5").await;
    let gone = app.upload(bucket.id, None, "gone.pdf", b"6").await;
    app.state
        .file_service
        .delete_file(&app.ctx(), gone.id, false)
        .await
        .expect("soft delete");

    let files = app
        .state
        .file_service
        .list_bucket_files(&app.ctx(), bucket.id)
        .await
        .expect("list bucket files");
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["z-root.pdf", "a.pdf", "b.pdf", "c.pdf"]);

    let err = app
        .state
        .file_service
        .list_bucket_files(&app.other_ctx(), bucket.id)
        .await
        .expect_err("foreign bucket");
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_tenant_listing_filters() {
    let app = helpers::TestApp::new();
    let first = app.bucket("tenant-list-a").await;
    let second = app.bucket("tenant-list-b").await;
    let docs = app.folder(first.id, None, "Docs").await;

    app.upload(first.id, None, "Quarterly Report.pdf", b"12345").await;
    app.upload(first.id, Some(docs.id), "notes.TXT", b"12").await;
    app.upload(second.id, None, "summary.pdf", b"1234567890").await;

    let all = list(&app, FileQuery::default()).await;
    assert_eq!(all.files.total, 3);
    assert_eq!(all.total_size, 17);

    let in_docs = list(&app, FileQuery {
        folder_id: Some(docs.id),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(in_docs.files.items.len(), 1);
    assert_eq!(in_docs.files.items[0].name, "notes.TXT");

    let txt = list(&app, FileQuery {
        extension: Some("txt".to_string()),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(txt.files.total, 1);

    let search = list(&app, FileQuery {
        search: Some("report".to_string()),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(search.files.items[0].name, "Quarterly Report.pdf");

    let sized = list(&app, FileQuery {
        min_size: Some(3),
        max_size: Some(9),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(sized.files.total, 1);
    assert_eq!(sized.total_size, 5);

    let future = list(&app, FileQuery {
        from_date: Some(after_newest(&all)),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(future.files.total, 0);
}

async fn list(app: &helpers::TestApp, query: FileQuery) -> FileListing {
    app.state
        .file_service
        .list_tenant_files(&app.ctx(), &query)
        .await
        .expect("list tenant files")
}

fn after_newest(listing: &FileListing) -> DateTime<Utc> {
    listing
        .files
        .items
        .iter()
        .map(|f| f.created_at)
        .max()
        .expect("files")
        + Duration::seconds(60)
}

#[tokio::test]
async fn test_tenant_listing_page_bounds() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("paging").await;
    for (name, data) in [
        ("a.bin", &b"1"[..]),
        ("b.bin", &b"22"[..]),
        ("c.bin", &b"333"[..]),
        ("d.bin", &b"4444"[..]),
        ("e.bin", &b"55555"[..]),
    ] {
        app.upload(bucket.id, None, name, data).await;
    }

    let page = |page: Option<u32>, limit: Option<u32>| FileQuery {
        page,
        limit,
        sort_by: FileSortField::Name,
        order: SortOrder::Asc,
        ..FileQuery::default()
    };
    let second = list(&app, page(Some(2), Some(2))).await;
    let names: Vec<_> = second.files.items.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["c.bin", "d.bin"]);
    assert_eq!(second.files.total_pages, 3);
    assert_eq!(second.total_size, 15);

    let zeroes = list(&app, page(Some(0), Some(0))).await;
    assert_eq!(zeroes.files.page, 1);
    assert_eq!(zeroes.files.limit, 50);
    assert_eq!(zeroes.files.items.len(), 5);

    let capped = list(&app, page(None, Some(1000))).await;
    assert_eq!(capped.files.limit, 100);

    let beyond = list(&app, page(Some(4), Some(2))).await;
    assert!(beyond.files.items.is_empty());
    assert_eq!(beyond.files.total, 5);

    let descending = list(&app, FileQuery {
        sort_by: FileSortField::Size,
        limit: Some(1),
        ..FileQuery::default()
    })
    .await;
    assert_eq!(descending.files.items[0].name, "e.bin");
}

#[tokio::test]
async fn test_tenant_listing_is_isolated_and_validated() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("isolated-list").await;
    app.upload(bucket.id, None, "mine.pdf", b"x").await;

    let theirs = app
        .state
        .file_service
        .list_tenant_files(&app.other_ctx(), &FileQuery::default())
        .await
        .expect("other tenant");
    assert_eq!(theirs.files.total, 0);

    let err = app
        .state
        .file_service
        .list_tenant_files(
            &app.ctx(),
            &FileQuery {
                min_size: Some(10),
                max_size: Some(1),
                ..FileQuery::default()
            },
        )
        .await
        .expect_err("inverted size range");
    assert_eq!(err.kind, ErrorKind::Validation);
}
