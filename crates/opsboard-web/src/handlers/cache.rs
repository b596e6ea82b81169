//! 캐시 제어 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use opsboard_core::models::cache::{CacheKeyStats, ClearCacheResult};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// 캐시 삭제 요청 본문
#[derive(Debug, Default, Deserialize)]
pub struct ClearCacheRequest {
    /// 삭제할 키 패턴 (없거나 비어 있으면 전체 삭제)
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ClearCacheRequest {
    /// 본문 파싱 (빈 본문은 전체 삭제 요청)
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
    }
}

/// GET /api/admin/monitoring/cache/stats
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<CacheKeyStats> {
    Json(state.monitoring.get_cache_stats().await)
}

/// POST /api/admin/monitoring/cache/clear
pub async fn clear_cache(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ClearCacheResult>, ApiError> {
    let request = ClearCacheRequest::parse(&body)?;
    info!(
        "캐시 삭제 요청: {}",
        request.pattern.as_deref().unwrap_or("(전체)")
    );

    let result = state
        .monitoring
        .clear_cache(request.pattern.as_deref())
        .await?;
    Ok(Json(result))
}
