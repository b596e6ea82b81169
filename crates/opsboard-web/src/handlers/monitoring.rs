//! 모니터링 조회 핸들러.
//!
//! 프로브 결과는 실패해도 응답 형태에 담겨 오므로 항상 200이다.
//! 롤업은 필수 쿼리가 실패하면 500을 돌려준다.

use axum::extract::State;
use axum::Json;
use opsboard_core::models::analytics::{
    ApiLatency, AppMetrics, EngagementMetrics, UserBehaviorMetrics, WebMetrics,
};
use opsboard_core::models::cache::CacheStats;
use opsboard_core::models::host::ServerMetrics;
use opsboard_core::models::queue::QueueStats;
use opsboard_core::models::store::DbPerformance;

use crate::error::ApiError;
use crate::AppState;

/// GET /api/admin/monitoring/server
pub async fn get_server(State(state): State<AppState>) -> Json<ServerMetrics> {
    Json(state.monitoring.get_server_metrics())
}

/// GET /api/admin/monitoring/api-latency
pub async fn get_api_latency(State(state): State<AppState>) -> Json<ApiLatency> {
    Json(state.monitoring.get_api_latency().await)
}

/// GET /api/admin/monitoring/redis
pub async fn get_cache_health(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.monitoring.get_redis_stats().await)
}

/// GET /api/admin/monitoring/database
pub async fn get_database(State(state): State<AppState>) -> Json<DbPerformance> {
    Json(state.monitoring.get_db_performance().await)
}

/// GET /api/admin/monitoring/queue
pub async fn get_queue(State(state): State<AppState>) -> Json<QueueStats> {
    Json(state.monitoring.get_queue_stats().await)
}

/// GET /api/admin/monitoring/app
pub async fn get_app(State(state): State<AppState>) -> Result<Json<AppMetrics>, ApiError> {
    Ok(Json(state.monitoring.get_app_metrics().await?))
}

/// GET /api/admin/monitoring/web
pub async fn get_web(State(state): State<AppState>) -> Result<Json<WebMetrics>, ApiError> {
    Ok(Json(state.monitoring.get_web_metrics().await?))
}

/// GET /api/admin/monitoring/user-behavior
pub async fn get_user_behavior(
    State(state): State<AppState>,
) -> Result<Json<UserBehaviorMetrics>, ApiError> {
    Ok(Json(state.monitoring.get_user_behavior_metrics().await?))
}

/// GET /api/admin/monitoring/engagement
pub async fn get_engagement(
    State(state): State<AppState>,
) -> Result<Json<EngagementMetrics>, ApiError> {
    Ok(Json(state.monitoring.get_engagement_metrics().await?))
}
