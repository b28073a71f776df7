//! HTTP tests for the storage location endpoints.
//!
//! Runs the full router against the in-memory store, so no database is
//! needed.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use stowage_core::service::{LocationService, LocationServiceImpl};
use stowage_core::InMemoryLocationStore;
use stowage_server::middleware::jwt::JwtConfig;
use stowage_server::router::build_router;
use tower::ServiceExt;

// ── Test JWT helpers ───────────────────────────────────────────

const TEST_JWT_SECRET: &[u8] = b"test-secret-for-http-tests";

#[derive(Debug, Serialize)]
struct TestClaims {
    sub: String,
    roles: Vec<String>,
    exp: u64,
}

fn make_jwt(actor_id: &str, secret: &[u8]) -> String {
    let claims = TestClaims {
        sub: actor_id.into(),
        roles: vec!["inventory".into()],
        exp: 4_102_444_800, // 2100-01-01
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .expect("failed to encode test JWT")
}

fn alice_jwt() -> String {
    make_jwt("alice", TEST_JWT_SECRET)
}

// ── Test app builder ───────────────────────────────────────────

fn build_test_app() -> (axum::Router, Arc<InMemoryLocationStore>) {
    let store = Arc::new(InMemoryLocationStore::new());
    let service: Arc<dyn LocationService> = Arc::new(LocationServiceImpl::new(store.clone()));
    let app = build_router(
        service,
        JwtConfig::from_secret(TEST_JWT_SECRET),
        Duration::from_secs(5),
    );
    (app, store)
}

fn post_json(uri: &str, body: &serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

const PREVIEW: &str = "/api/storage-locations/preview";
const BULK_CREATE: &str = "/api/storage-locations/bulk-create";

// ── Fixtures ───────────────────────────────────────────────────

fn box_row() -> serde_json::Value {
    serde_json::json!({
        "prefix": "box1-",
        "layout_type": "row",
        "ranges": [{ "range_type": "letters", "start": "a", "end": "f" }],
        "location_type": "box"
    })
}

fn drawer_grid() -> serde_json::Value {
    serde_json::json!({
        "prefix": "drawer-",
        "layout_type": "grid",
        "ranges": [
            { "range_type": "letters", "start": "a", "end": "f" },
            { "range_type": "numbers", "start": 1, "end": 5 }
        ],
        "separators": ["-"],
        "location_type": "drawer"
    })
}

fn warehouse_3d() -> serde_json::Value {
    serde_json::json!({
        "prefix": "warehouse-",
        "layout_type": "grid_3d",
        "ranges": [
            { "range_type": "letters", "start": "a", "end": "c" },
            { "range_type": "numbers", "start": "1", "end": "4" },
            { "range_type": "numbers", "start": 1, "end": 3 }
        ],
        "separators": ["-", "."],
        "location_type": "shelf"
    })
}

fn oversized_grid() -> serde_json::Value {
    serde_json::json!({
        "prefix": "",
        "layout_type": "grid",
        "ranges": [
            { "range_type": "letters", "start": "a", "end": "z" },
            { "range_type": "numbers", "start": 1, "end": 30 }
        ],
        "separators": ["-"],
        "location_type": "bin"
    })
}

fn test_row() -> serde_json::Value {
    serde_json::json!({
        "prefix": "test-",
        "layout_type": "row",
        "ranges": [{ "range_type": "letters", "start": "a", "end": "c" }],
        "location_type": "bin"
    })
}

// ── Health ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_no_auth() {
    let (app, _) = build_test_app();
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

// ── Preview ────────────────────────────────────────────────────

#[tokio::test]
async fn test_preview_row() {
    let (app, _) = build_test_app();
    let resp = app.oneshot(post_json(PREVIEW, &box_row(), None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 6);
    assert_eq!(
        body["sample_names"],
        serde_json::json!(["box1-a", "box1-b", "box1-c", "box1-d", "box1-e"])
    );
    assert_eq!(body["last_name"], "box1-f");
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_preview_grid() {
    let (app, _) = build_test_app();
    let resp = app
        .oneshot(post_json(PREVIEW, &drawer_grid(), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 30);
    assert_eq!(body["sample_names"][0], "drawer-a-1");
    assert_eq!(body["last_name"], "drawer-f-5");
}

#[tokio::test]
async fn test_preview_grid_3d_accepts_numeric_strings() {
    let (app, _) = build_test_app();
    let resp = app
        .oneshot(post_json(PREVIEW, &warehouse_3d(), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 36);
    assert_eq!(body["last_name"], "warehouse-c-4.3");
}

#[tokio::test]
async fn test_preview_zero_pad() {
    let (app, _) = build_test_app();
    let config = serde_json::json!({
        "layout_type": "row",
        "ranges": [{ "range_type": "numbers", "start": 1, "end": 15, "zero_pad": true }],
        "location_type": "bin"
    });
    let resp = app.oneshot(post_json(PREVIEW, &config, None)).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["sample_names"][0], "01");
    assert_eq!(body["last_name"], "15");
    assert_eq!(body["warnings"], serde_json::json!([]));
}

#[tokio::test]
async fn test_preview_oversized_is_200_invalid() {
    let (app, _) = build_test_app();
    let resp = app
        .oneshot(post_json(PREVIEW, &oversized_grid(), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["total_count"], 780);
    assert!(body["errors"][0].as_str().unwrap().contains("500"));
    assert!(!body["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_reversed_range_is_200_invalid() {
    let (app, _) = build_test_app();
    let config = serde_json::json!({
        "layout_type": "row",
        "ranges": [{ "range_type": "numbers", "start": 9, "end": 2 }],
        "location_type": "bin"
    });
    let resp = app.oneshot(post_json(PREVIEW, &config, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_preview_malformed_json_is_400() {
    let (app, _) = build_test_app();
    let req = Request::builder()
        .method("POST")
        .uri(PREVIEW)
        .header("content-type", "application/json")
        .body(Body::from("{\"layout_type\": "))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["kind"], "schema");
}

#[tokio::test]
async fn test_preview_bad_enum_is_422() {
    let (app, _) = build_test_app();
    let config = serde_json::json!({
        "layout_type": "hexagon",
        "ranges": [],
        "location_type": "bin"
    });
    let resp = app.oneshot(post_json(PREVIEW, &config, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["kind"], "schema");
}

#[tokio::test]
async fn test_preview_missing_content_type_is_415() {
    let (app, _) = build_test_app();
    let req = Request::builder()
        .method("POST")
        .uri(PREVIEW)
        .body(Body::from(test_row().to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(resp).await["kind"], "schema");
}

#[tokio::test]
async fn test_preview_does_not_write() {
    let (app, store) = build_test_app();
    let resp = app.oneshot(post_json(PREVIEW, &box_row(), None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(store.is_empty().await);
}

// ── Bulk create: auth ──────────────────────────────────────────

#[tokio::test]
async fn test_bulk_create_requires_auth() {
    let (app, store) = build_test_app();
    let resp = app
        .oneshot(post_json(BULK_CREATE, &box_row(), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["kind"], "unauthorized");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bulk_create_rejects_foreign_token() {
    let (app, _) = build_test_app();
    let token = make_jwt("mallory", b"some-other-secret");
    let resp = app
        .oneshot(post_json(BULK_CREATE, &box_row(), Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Bulk create: outcomes ──────────────────────────────────────

#[tokio::test]
async fn test_bulk_create_returns_201() {
    let (app, store) = build_test_app();
    let resp = app
        .oneshot(post_json(BULK_CREATE, &drawer_grid(), Some(&alice_jwt())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["created_count"], 30);
    assert_eq!(body["created_ids"].as_array().unwrap().len(), 30);
    assert_eq!(store.len().await, 30);
}

#[tokio::test]
async fn test_bulk_create_twice_conflicts_and_changes_nothing() {
    let (app, store) = build_test_app();
    let token = alice_jwt();

    let resp = app
        .clone()
        .oneshot(post_json(BULK_CREATE, &test_row(), Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["created_count"], 3);
    let after_first = store.names().await;

    let resp = app
        .oneshot(post_json(BULK_CREATE, &test_row(), Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["created_count"], 0);
    assert_eq!(body["error"]["kind"], "duplicate_names");
    assert_eq!(
        body["error"]["conflicting_names"],
        serde_json::json!(["test-a", "test-b", "test-c"])
    );
    assert_eq!(store.names().await, after_first);
}

#[tokio::test]
async fn test_bulk_create_oversized_is_200_failure() {
    let (app, store) = build_test_app();
    let resp = app
        .oneshot(post_json(BULK_CREATE, &oversized_grid(), Some(&alice_jwt())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["created_count"], 0);
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"]["errors"][0].as_str().unwrap().contains("500"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_colliding_layout_is_invalid_on_both_endpoints() {
    let (app, store) = build_test_app();
    let config = serde_json::json!({
        "prefix": "x",
        "layout_type": "grid",
        "ranges": [
            { "range_type": "numbers", "start": 1, "end": 11 },
            { "range_type": "numbers", "start": 1, "end": 11 }
        ],
        "separators": [""],
        "location_type": "bin"
    });

    let resp = app
        .clone()
        .oneshot(post_json(PREVIEW, &config, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["is_valid"], false);
    assert!(body["errors"][0].as_str().unwrap().contains("x111"));

    let resp = app
        .oneshot(post_json(BULK_CREATE, &config, Some(&alice_jwt())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "validation");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bulk_create_missing_parent_is_404() {
    let (app, store) = build_test_app();
    let mut config = box_row();
    config["parent_id"] = serde_json::json!(uuid::Uuid::new_v4());
    let resp = app
        .oneshot(post_json(BULK_CREATE, &config, Some(&alice_jwt())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["kind"], "parent_not_found");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bulk_create_bad_location_type_is_422() {
    let (app, _) = build_test_app();
    let mut config = box_row();
    config["location_type"] = serde_json::json!("closet");
    let resp = app
        .oneshot(post_json(BULK_CREATE, &config, Some(&alice_jwt())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Read back ──────────────────────────────────────────────────

#[tokio::test]
async fn test_created_location_is_readable_with_hierarchy() {
    let (app, _) = build_test_app();
    let token = alice_jwt();

    let parent = serde_json::json!({
        "prefix": "aisle-1",
        "layout_type": "single",
        "location_type": "room"
    });
    let resp = app
        .clone()
        .oneshot(post_json(BULK_CREATE, &parent, Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let parent_id = body_json(resp).await["created_ids"][0]
        .as_str()
        .unwrap()
        .to_string();

    let mut child = box_row();
    child["parent_id"] = serde_json::json!(parent_id);
    let resp = app
        .clone()
        .oneshot(post_json(BULK_CREATE, &child, Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let last_id = body_json(resp).await["created_ids"][5]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .oneshot(get(&format!("/api/storage-locations/{last_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "box1-f");
    assert_eq!(body["type"], "box");
    assert_eq!(body["parent_id"], parent_id.as_str());
    assert_eq!(body["location_hierarchy"], "aisle-1/box1-f");
    assert_eq!(body["created_by"], "alice");
    assert_eq!(body["layout_config"]["total_count"], 6);
}

#[tokio::test]
async fn test_get_unknown_location_is_404() {
    let (app, _) = build_test_app();
    let resp = app
        .oneshot(get(&format!(
            "/api/storage-locations/{}",
            uuid::Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["kind"], "not_found");
}
