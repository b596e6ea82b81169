//! # opsboard-monitoring
//!
//! 운영 메트릭 집계 서비스.
//! 호스트, 캐시, 관계형 저장소, 작업 큐에서 상태 신호를 모아 대시보드용 읽기 모델로 합친다.
//!
//! ## 모듈
//! - `host`: 서버 리소스 (CPU/메모리/업타임)
//! - `cache_probe`: 캐시 헬스 프로브 (상태 머신 + 타임아웃 ping)
//! - `store_probe`: 관계형 저장소 지연 시간, 테이블 크기
//! - `queue_probe`: 큐별 작업 수
//! - `rollups`: 앱/웹/사용자 행동/참여도 분석 롤업
//! - `cache_control`: 패턴/전체 캐시 삭제, 키 통계
//! - `latency`: API 지연 시간 윈도우와 스냅샷
//! - `support`: best-effort 쿼리 헬퍼
//!
//! 읽기 연산은 실패를 반환 형태에 담고, 파괴적 연산(`clear_cache`)만 에러를 돌려준다.

pub mod cache_control;
pub mod cache_probe;
pub mod error;
pub mod host;
pub mod latency;
pub mod queue_probe;
pub mod rollups;
pub mod store_probe;
pub mod support;

#[cfg(test)]
pub(crate) mod test_support;

use opsboard_core::config::{AppConfig, CacheConfig, MonitoringConfig};
use opsboard_core::ports::cache::CacheStore;
use opsboard_core::ports::host::HostMonitor;
use opsboard_core::ports::queue::QueueInspector;
use opsboard_core::ports::store::RelationalStore;
use std::sync::Arc;

pub use error::MonitoringError;
pub use latency::LatencyTracker;

/// 운영 메트릭 집계 서비스
///
/// 협력 시스템은 모두 생성자/빌더로 주입한다. 캐시와 큐는 없을 수 있으며,
/// 없으면 해당 프로브가 "미연결" 결과를 돌려준다.
pub struct MonitoringService {
    pub(crate) store: Arc<dyn RelationalStore>,
    pub(crate) host: Arc<dyn HostMonitor>,
    pub(crate) cache: Option<Arc<dyn CacheStore>>,
    pub(crate) queues: Option<Arc<dyn QueueInspector>>,
    pub(crate) cache_config: CacheConfig,
    pub(crate) config: MonitoringConfig,
}

impl MonitoringService {
    /// 새 서비스 생성
    pub fn new(
        store: Arc<dyn RelationalStore>,
        host: Arc<dyn HostMonitor>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            host,
            cache: None,
            queues: None,
            cache_config: config.cache.clone(),
            config: config.monitoring.clone(),
        }
    }

    /// 캐시 저장소 설정
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 작업 큐 조회기 설정
    pub fn with_queue_inspector(mut self, queues: Arc<dyn QueueInspector>) -> Self {
        self.queues = Some(queues);
        self
    }

    /// 모니터링 설정
    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }
}
