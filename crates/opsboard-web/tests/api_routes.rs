//! HTTP 라우트 통합 테스트.
//!
//! 인메모리 SQLite와 인메모리 캐시로 라우터 전체를 `oneshot` 요청으로 구동한다.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use opsboard_core::config::AppConfig;
use opsboard_core::models::cache::CacheStatus;
use opsboard_core::ports::cache::CacheStore;
use opsboard_monitor::host::SysInfoHostMonitor;
use opsboard_monitoring::{LatencyTracker, MonitoringService};
use opsboard_storage::cache::MemoryCacheStore;
use opsboard_storage::sqlite::SqliteStore;
use opsboard_web::{router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(cache: Option<Arc<MemoryCacheStore>>) -> (Router, Arc<LatencyTracker>) {
    let config = AppConfig::default_config();
    let mut monitoring = MonitoringService::new(
        Arc::new(SqliteStore::open_in_memory().unwrap()),
        Arc::new(SysInfoHostMonitor::new(false)),
        &config,
    );
    if let Some(cache) = cache {
        monitoring = monitoring.with_cache(cache);
    }
    let latency = Arc::new(LatencyTracker::new(config.monitoring.latency_window));
    let state = AppState {
        monitoring: Arc::new(monitoring),
        latency: latency.clone(),
    };
    (router(state), latency)
}

async fn call(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, Body::empty()).await
}

#[tokio::test]
async fn read_routes_respond_in_camel_case() {
    let (app, latency) = app_with(Some(Arc::new(MemoryCacheStore::new())));

    let (status, server) = get(app.clone(), "/api/admin/monitoring/server").await;
    assert_eq!(status, StatusCode::OK);
    assert!(server["runtimeVersion"].as_str().unwrap().starts_with('v'));

    let (_, app_metrics) = get(app.clone(), "/api/admin/monitoring/app").await;
    assert_eq!(app_metrics["crashes"], 0);
    assert!(app_metrics["recentCrashes"].as_array().unwrap().is_empty());

    let (_, web) = get(app.clone(), "/api/admin/monitoring/web").await;
    assert_eq!(web["trafficSummary"]["last7Days"].as_array().unwrap().len(), 7);

    let (_, behavior) = get(app.clone(), "/api/admin/monitoring/user-behavior").await;
    assert_eq!(behavior["scorecardTracking"]["distribution"]["1000+"], 0);

    let (_, engagement) = get(app.clone(), "/api/admin/monitoring/engagement").await;
    assert_eq!(engagement["notifications"]["readRate"], 0.0);

    let (_, queue) = get(app.clone(), "/api/admin/monitoring/queue").await;
    assert_eq!(queue["jobs"].as_object().unwrap().len(), 4);

    let (_, database) = get(app.clone(), "/api/admin/monitoring/database").await;
    assert!(database["queryTime"].is_u64());

    let (_, api_latency) = get(app, "/api/admin/monitoring/api-latency").await;
    assert_eq!(api_latency["requests"], 0);

    assert_eq!(latency.snapshot().requests, 8);
}

#[tokio::test]
async fn cache_health_reports_connection_tag() {
    let cache = Arc::new(MemoryCacheStore::new());
    let (app, _) = app_with(Some(cache.clone()));

    let (_, body) = get(app.clone(), "/api/admin/monitoring/redis").await;
    assert_eq!(body["connected"], true);
    assert_eq!(body["hitRate"], 0.0);

    cache.set_status(CacheStatus::Connecting);
    let (status, body) = get(app, "/api/admin/monitoring/redis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["status"], "connecting");
}

#[tokio::test]
async fn clear_cache_by_pattern() {
    let cache = Arc::new(MemoryCacheStore::new());
    cache.set("user:1", "a").await.unwrap();
    cache.set("user:2", "b").await.unwrap();
    cache.set("feed:1", "c").await.unwrap();
    let (app, _) = app_with(Some(cache.clone()));

    let (status, body) = call(
        app.clone(),
        Method::POST,
        "/api/admin/monitoring/cache/clear",
        Body::from(r#"{"pattern":"user:*"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 2);
    assert_eq!(body["message"], "Cleared 2 keys matching pattern \"user:*\"");

    let (_, stats) = get(app.clone(), "/api/admin/monitoring/cache/stats").await;
    assert_eq!(stats["totalKeys"], 1);
    assert_eq!(stats["memory"]["connected"], true);

    let (_, body) = call(
        app,
        Method::POST,
        "/api/admin/monitoring/cache/clear",
        Body::empty(),
    )
    .await;
    assert_eq!(body["cleared"], "all");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn clear_cache_error_statuses() {
    let (app, _) = app_with(None);
    let (status, body) = call(
        app,
        Method::POST,
        "/api/admin/monitoring/cache/clear",
        Body::from("{}"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
    assert_eq!(
        body["error"],
        "Failed to clear cache: Cache client not available"
    );

    let (app, _) = app_with(Some(Arc::new(MemoryCacheStore::new())));
    let (status, body) = call(
        app,
        Method::POST,
        "/api/admin/monitoring/cache/clear",
        Body::from("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn missing_cache_stats_are_reported_in_body() {
    let (app, _) = app_with(None);
    let (status, body) = get(app, "/api/admin/monitoring/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalKeys"], 0);
    assert_eq!(body["error"], "Cache client not available");
}
