//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// 모니터링 라우트 (`/api/admin/monitoring` 아래에 중첩)
pub fn monitoring_routes() -> Router<AppState> {
    Router::new()
        // 프로브
        .route("/server", get(handlers::monitoring::get_server))
        .route("/api-latency", get(handlers::monitoring::get_api_latency))
        .route("/redis", get(handlers::monitoring::get_cache_health))
        .route("/database", get(handlers::monitoring::get_database))
        .route("/queue", get(handlers::monitoring::get_queue))
        // 분석 롤업
        .route("/app", get(handlers::monitoring::get_app))
        .route("/web", get(handlers::monitoring::get_web))
        .route(
            "/user-behavior",
            get(handlers::monitoring::get_user_behavior),
        )
        .route("/engagement", get(handlers::monitoring::get_engagement))
        // 캐시 제어
        .route("/cache/stats", get(handlers::cache::get_cache_stats))
        .route("/cache/clear", post(handlers::cache::clear_cache))
}

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/admin/monitoring", monitoring_routes())
}
