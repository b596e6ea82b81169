//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use opsboard_core::error::{describe_error, CoreError};
use opsboard_monitoring::MonitoringError;
use serde::Serialize;
use thiserror::Error;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 내부 서버 오류
    #[error("{0}")]
    Internal(String),

    /// 협력 시스템 미연결
    #[error("{0}")]
    ServiceUnavailable(String),

    /// 잘못된 요청
    #[error("{0}")]
    BadRequest(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Internal(describe_error(&err).message)
    }
}

impl From<MonitoringError> for ApiError {
    fn from(err: MonitoringError) -> Self {
        match err {
            MonitoringError::Core(e) => e.into(),
            MonitoringError::CacheUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            MonitoringError::ClearCache(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_cache_errors_map_to_status() {
        let unavailable: ApiError =
            MonitoringError::CacheUnavailable("Cache client not available".into()).into();
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let failed: ApiError = MonitoringError::ClearCache("READONLY replica".into()).into();
        assert_eq!(failed.to_string(), "Failed to clear cache: READONLY replica");
        assert_eq!(
            failed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_are_internal() {
        let err: ApiError = MonitoringError::Core(CoreError::Store("down".into())).into();
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("down")));
    }
}
