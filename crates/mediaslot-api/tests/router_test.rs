//! HTTP surface tests: routing, service auth, headers, and a full multipart
//! upload driven through the router.

mod helpers;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use helpers::{png_file, spawn_app, SERVICE_ID, SERVICE_KEY};
use tower::ServiceExt;

const BOUNDARY: &str = "mediaslot-test-boundary";

fn authed(request: axum::http::request::Builder) -> axum::http::request::Builder {
    request
        .header("x-service-id", SERVICE_ID)
        .header("x-service-key", SERVICE_KEY)
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (filename, content_type, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_service_credentials() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/entity/E1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/entity/E1")
                .header("x-service-id", SERVICE_ID)
                .header("x-service-key", "wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_empty_entity_returns_empty_array() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().uri("/media/entity/none"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[tokio::test]
async fn test_multipart_upload_end_to_end() {
    let app = spawn_app().await;

    let body = multipart_body(
        &[
            ("entityId", "E1"),
            ("entityType", "product"),
            ("companyId", "C1"),
        ],
        &[
            ("a.png", "image/png", b"png-bytes-a"),
            ("b.png", "image/png", b"png-bytes-b"),
        ],
    );

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/media/upload"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let created = value.as_array().expect("array of descriptors");
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["position"], 0);
    assert_eq!(created[0]["stored_name"], "E1-0.png");
    assert_eq!(created[1]["position"], 1);
    assert_eq!(created[1]["stored_name"], "E1-1.png");

    // The stored binary is now served on the public file route.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/file/E1-0.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=31536000, immutable"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes-a");
}

#[tokio::test]
async fn test_upload_without_files_is_bad_request() {
    let app = spawn_app().await;

    let body = multipart_body(
        &[
            ("entityId", "E1"),
            ("entityType", "product"),
            ("companyId", "C1"),
        ],
        &[],
    );

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/media/upload"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_fetch_for_unknown_slot_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/file/missing-0.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_without_company_id_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("DELETE").uri("/media/E1/0"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_with_mismatched_cached_owner_is_forbidden() {
    let app = spawn_app().await;

    app.state
        .slots
        .upload("E1", "product", "C1", vec![png_file("a.png")])
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("DELETE")
                    .uri("/media/E1/0?companyId=C2"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logo_fetch_not_found_then_public_after_upload() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/company-logo/file/C1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.state
        .logos
        .replace("C1", png_file("logo.png"))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media/company-logo/file/C1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
}

#[tokio::test]
async fn test_logo_metadata_flag_returns_descriptor_with_url() {
    let app = spawn_app().await;

    app.state
        .logos
        .replace("C1", png_file("logo.png"))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().uri("/media/company-logo/C1?metadata=true"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["original_name"], "logo.png");
    assert_eq!(value["stored_name"], "logo-C1.png");
    assert_eq!(
        value["url"],
        "http://localhost:4000/media/company-logo/file/C1"
    );
}
