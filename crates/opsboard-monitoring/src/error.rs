//! 모니터링 서비스 에러.

use opsboard_core::error::CoreError;
use thiserror::Error;

/// 모니터링 서비스 에러
#[derive(Debug, Error)]
pub enum MonitoringError {
    /// 필수 쿼리 실패 (롤업 전체 실패)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 캐시 삭제 전제 조건 불충족 (클라이언트 없음, 미연결)
    #[error("Failed to clear cache: {0}")]
    CacheUnavailable(String),

    /// 캐시 삭제 중 명령 실패
    #[error("Failed to clear cache: {0}")]
    ClearCache(String),
}
