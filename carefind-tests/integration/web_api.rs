//! Router-level tests for the JSON API: statuses, bodies, caller shapes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use carefind_search::PackageSearchService;
use carefind_web::{AppState, router};

use crate::support::{LABELED_ANSWER, ScriptedOracle};

fn app_with(oracle: ScriptedOracle) -> Router {
    let service = PackageSearchService::with_provider(Box::new(oracle), false);
    router(AppState::new(service))
}

async fn post_search(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn search_returns_structured_packages() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let (status, body) = post_search(app, "/search", json!({"query": "full body checkup"})).await;

    assert_eq!(status, StatusCode::OK);
    let packages = body["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0]["hospital"], "Apollo Hospitals");
    assert_eq!(packages[0]["price"], "4999");
}

#[tokio::test]
async fn api_search_alias_serves_the_same_handler() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let (status, body) =
        post_search(app, "/api/search", json!({"query": "full body checkup"})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["packages"].is_array());
}

#[tokio::test]
async fn nested_body_caller_shape_is_accepted() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let (status, _) = post_search(
        app,
        "/search",
        json!({"body": {"query": "cardiac package"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_query_is_a_400_with_error_body() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let (status, body) = post_search(app, "/search", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");
}

#[tokio::test]
async fn blank_query_is_a_400_with_error_body() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let (status, body) = post_search(app, "/search", json!({"query": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");
}

#[tokio::test]
async fn oracle_timeout_maps_to_504_with_retry_message() {
    let app = app_with(ScriptedOracle::timing_out());

    let (status, body) = post_search(app, "/search", json!({"query": "checkup"})).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    let message = body["error"].as_str().unwrap();
    assert!(message.to_lowercase().contains("try again"));
}

#[tokio::test]
async fn unreachable_oracle_maps_to_503() {
    let app = app_with(ScriptedOracle::unreachable());

    let (status, body) = post_search(app, "/search", json!({"query": "checkup"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("connect"));
}

#[tokio::test]
async fn root_serves_the_search_page() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_redirection());
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(location, "/static/index.html");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app_with(ScriptedOracle::answering(LABELED_ANSWER));

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn fallback_result_still_returns_a_single_package() {
    let app = app_with(ScriptedOracle::answering(
        "No matching packages were found for your query.",
    ));

    let (status, body) = post_search(app, "/search", json!({"query": "checkup"})).await;

    assert_eq!(status, StatusCode::OK);
    let packages = body["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(
        packages[0]["description"],
        "No matching packages were found for your query."
    );
}
