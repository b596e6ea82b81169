//! 작업 큐 조회 포트.
//!
//! 구현: `opsboard-monitor::job_queue::JobQueueRegistry`

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::queue::QueueSnapshot;

/// 큐별 작업 상태 카운트 조회
#[async_trait]
pub trait QueueInspector: Send + Sync {
    /// 알려진 모든 큐의 스냅샷
    async fn snapshots(&self) -> Result<Vec<QueueSnapshot>, CoreError>;
}
