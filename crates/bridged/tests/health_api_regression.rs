//! Health API regression tests.
//!
//! Drives the assembled router the way an external caller would: reports
//! application health, reads the live and cached summaries, and checks
//! the status-code mapping and payload shape.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use bridge_api::build_router;
use bridge_health::{
    ApplicationsHealthIndicator, AsyncCompositeHealthEndpoint, AsyncCompositeHealthIndicator,
    BridgeHealthAggregator, CompositeServiceHealthIndicator,
};
use bridge_registry::InMemoryApplicationRegistry;

fn test_router() -> (Router, Arc<AsyncCompositeHealthIndicator>) {
    let registry = Arc::new(InMemoryApplicationRegistry::new());
    let services = Arc::new(CompositeServiceHealthIndicator::new());
    let applications = Arc::new(ApplicationsHealthIndicator::new(registry.clone()));
    let indicator = Arc::new(AsyncCompositeHealthIndicator::new(
        services.clone(),
        applications.clone(),
        BridgeHealthAggregator,
        "0.1.0",
    ));
    let endpoint = Arc::new(AsyncCompositeHealthEndpoint::new(
        indicator.clone(),
        services,
        applications,
        BridgeHealthAggregator,
    ));

    (build_router(endpoint, registry), indicator)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn report_request(id: &str, status: &str) -> Request<Body> {
    let body = serde_json::json!({"name": format!("{id} integration"), "status": status});
    Request::builder()
        .method("PUT")
        .uri(format!("/v1/applications/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_with_no_integrations_is_down() {
    let (router, _) = test_router();

    let req = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["message"], "There is no active Integration");
    // No refresh has run: live reads reuse the cached version baseline.
    assert_eq!(json["version"], "Unknown Version");
}

#[tokio::test]
async fn health_goes_up_after_an_application_reports_in() {
    let (router, _) = test_router();

    let resp = router
        .clone()
        .oneshot(report_request("jira", "UP"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "UP");
    assert_eq!(json["message"], "Success");
    assert_eq!(json["applications"][0]["id"], "jira");
}

#[tokio::test]
async fn cached_health_serves_the_placeholder_until_a_refresh() {
    let (router, indicator) = test_router();

    let req = Request::builder()
        .uri("/v1/health/cached")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "UNKNOWN");
    assert_eq!(json["version"], "Unknown Version");

    // After a refresh the cache reports the computed result.
    indicator.refresh().await;

    let req = Request::builder()
        .uri("/v1/health/cached")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    // Empty registry: the computed aggregate is DOWN.
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["version"], "0.1.0");
}

#[tokio::test]
async fn live_reads_do_not_write_the_cache() {
    let (router, indicator) = test_router();

    router
        .clone()
        .oneshot(report_request("jira", "UP"))
        .await
        .unwrap();

    let req = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The cache is untouched by the live read.
    let cached = indicator.health();
    assert_eq!(cached.version, "Unknown Version");
}

#[tokio::test]
async fn applications_listing_keeps_report_order() {
    let (router, _) = test_router();

    for id in ["zapier", "jira", "github"] {
        router
            .clone()
            .oneshot(report_request(id, "UP"))
            .await
            .unwrap();
    }

    let req = Request::builder()
        .uri("/v1/applications")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["zapier", "jira", "github"]);
}

#[tokio::test]
async fn repeated_report_updates_instead_of_duplicating() {
    let (router, _) = test_router();

    let resp = router
        .clone()
        .oneshot(report_request("jira", "UP"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router
        .clone()
        .oneshot(report_request("jira", "DOWN"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .uri("/v1/applications")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let json = body_json(resp).await;

    let apps = json.as_array().unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["status"], "DOWN");
}
