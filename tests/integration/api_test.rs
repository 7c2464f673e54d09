//! Integration tests for the HTTP layer.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["storage_provider"], "memory");
}

#[tokio::test]
async fn test_missing_identity_headers_rejected() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/buckets", None, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_folder_lifecycle_over_http() {
    let app = helpers::TestApp::new();
    let tenant = Some(app.tenant_id);

    let response = app
        .request("POST", "/api/buckets", Some(json!({ "name": "http-bucket" })), tenant)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let bucket_id = response.body["data"]["id"].as_str().expect("id").to_string();

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "bucket_id": bucket_id, "name": "Reports" })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let reports = response.body["data"]["id"].as_str().expect("id").to_string();

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "bucket_id": bucket_id, "parent_id": reports, "name": "2024" })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let year = response.body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(response.body["data"]["path"], "Reports");

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "bucket_id": bucket_id, "parent_id": reports, "name": "2024" })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/api/folders/{reports}/move"),
            Some(json!({ "parent_id": year })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("GET", "/api/folders/tree?depth=2", None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["name"], "Reports");
    assert_eq!(response.body["data"][0]["children"][0]["name"], "2024");

    let response = app
        .request("DELETE", &format!("/api/folders/{reports}"), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("GET", &format!("/api/folders/{year}"), None, Some(app.other_ctx().tenant_id))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", &format!("/api/folders/{}", filevault_core::types::FolderId::new()), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

fn multipart_upload(app: &helpers::TestApp, bucket: &str, data: &[u8]) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"bucket_id\"\r\n\r\n{bucket}\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"blob.bin\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/files")
        .header("x-tenant-id", app.tenant_id.to_string())
        .header("x-user-id", app.user_id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn test_upload_at_exact_size_limit_passes_router() {
    let app = helpers::TestApp::with_config(|config| config.storage.max_upload_size_bytes = 1024);
    let bucket = app.bucket("size-limit").await;

    let request = multipart_upload(&app, &bucket.id.to_string(), &[7u8; 1024]);
    let response = app.router().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = multipart_upload(&app, &bucket.id.to_string(), &[7u8; 1025]);
    let response = app.router().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_file_listings_over_http() {
    let app = helpers::TestApp::new();
    let tenant = Some(app.tenant_id);
    let bucket = app.bucket("listings").await;
    let docs = app.folder(bucket.id, None, "Docs").await;
    app.upload(bucket.id, None, "root.pdf", b"r").await;
    app.upload(bucket.id, Some(docs.id), "alpha.pdf", b"aaaa").await;
    app.upload(bucket.id, Some(docs.id), "beta.txt", b"bb").await;

    let response = app
        .request("GET", &format!("/api/buckets/{}/files/all", bucket.id), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().expect("files").len(), 3);

    let response = app
        .request("GET", &format!("/api/buckets/{}/files", bucket.id), None, tenant)
        .await;
    assert_eq!(response.body["data"].as_array().expect("files").len(), 1);

    let response = app
        .request(
            "GET",
            "/api/files?extension=pdf&sort_by=size&order=asc&limit=1&page=2",
            None,
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let listing = &response.body["data"];
    assert_eq!(listing["files"]["total"], 2);
    assert_eq!(listing["files"]["total_pages"], 2);
    assert_eq!(listing["files"]["items"][0]["name"], "alpha.pdf");
    assert_eq!(listing["total_size"], 5);

    let response = app
        .request("GET", "/api/files?min_size=10&max_size=1", None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "GET",
            &format!("/api/buckets/{}/files/all", bucket.id),
            None,
            Some(filevault_core::types::TenantId::new()),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_multipart_upload_and_download() {
    let app = helpers::TestApp::new();
    let bucket = app.bucket("multipart").await;
    let folder = app.folder(bucket.id, None, "Docs").await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"bucket_id\"\r\n\r\n{bucket}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"folder_id\"\r\n\r\n{folder}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nhello world\r\n--{b}--\r\n",
        b = boundary,
        bucket = bucket.id,
        folder = folder.id,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/files")
        .header("x-tenant-id", app.tenant_id.to_string())
        .header("x-user-id", app.user_id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");
    let response = app.router().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    let file_id = json["data"]["id"].as_str().expect("id").to_string();
    let key = json["data"]["object_key"].as_str().expect("key");
    assert_eq!(key, format!("Docs/{file_id}/hello.txt"));
    assert_eq!(json["data"]["content_type"], "text/plain");

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/files/{file_id}/download"))
        .header("x-tenant-id", app.tenant_id.to_string())
        .header("x-user-id", app.user_id.to_string())
        .body(Body::empty())
        .expect("request");
    let response = app.router().oneshot(request).await.expect("download");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().expect("header"),
        "text/plain"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&bytes[..], b"hello world");
}

#[tokio::test]
async fn test_file_placement_over_http() {
    let app = helpers::TestApp::new();
    let tenant = Some(app.tenant_id);
    let bucket = app.bucket("http-files").await;
    let archive = app.folder(bucket.id, None, "Archive").await;
    let file = app.upload(bucket.id, None, "a.pdf", b"pdf").await;

    let response = app
        .request(
            "POST",
            &format!("/api/files/{}/move", file.id),
            Some(json!({ "folder_id": archive.id })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["object_key"],
        format!("Archive/{}/a.pdf", file.id)
    );

    let response = app
        .request(
            "POST",
            &format!("/api/files/{}/duplicate", file.id),
            Some(json!({})),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "a - Copy.pdf");

    let response = app
        .request("DELETE", &format!("/api/files/{}", file.id), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("POST", &format!("/api/files/{}/restore", file.id), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("POST", &format!("/api/files/{}/restore", file.id), None, tenant)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/api/admin/buckets/{}/backfill", bucket.id),
            Some(json!({ "relocate_objects": true })),
            tenant,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["objects_relocated"], 0);
}
