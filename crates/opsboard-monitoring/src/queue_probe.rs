//! 작업 큐 프로브.

use opsboard_core::models::queue::QueueStats;
use tracing::debug;

use crate::support::try_or_default;
use crate::MonitoringService;

impl MonitoringService {
    /// 큐별 작업 수와 전체 합계
    ///
    /// 설정된 큐 이름은 항상 포함된다. 조회기가 없거나 실패하면 0으로 채운다.
    pub async fn get_queue_stats(&self) -> QueueStats {
        let snapshots = match &self.queues {
            Some(queues) => try_or_default("queue_snapshots", queues.snapshots(), Vec::new()).await,
            None => Vec::new(),
        };

        let stats = QueueStats::from_snapshots(&self.config.queue_names, &snapshots);
        debug!(
            "큐 통계: active {}, waiting {}, failed {}",
            stats.active, stats.waiting, stats.failed
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{service_with, FlakyStore};
    use async_trait::async_trait;
    use opsboard_core::error::CoreError;
    use opsboard_core::models::queue::{QueueCounts, QueueSnapshot};
    use opsboard_core::ports::queue::QueueInspector;
    use std::sync::Arc;

    struct StaticQueues(Result<Vec<QueueSnapshot>, ()>);

    #[async_trait]
    impl QueueInspector for StaticQueues {
        async fn snapshots(&self) -> Result<Vec<QueueSnapshot>, CoreError> {
            self.0
                .clone()
                .map_err(|_| CoreError::Queue("broker unreachable".into()))
        }
    }

    #[tokio::test]
    async fn without_inspector_configured_queues_are_zero() {
        let stats = service_with(Arc::new(FlakyStore::new()))
            .get_queue_stats()
            .await;
        assert_eq!(stats.jobs.len(), 4);
        assert_eq!(stats.jobs["email"], QueueCounts::default());
        assert_eq!(stats.delayed, 0);
    }

    #[tokio::test]
    async fn snapshots_are_summed() {
        let queues = StaticQueues(Ok(vec![QueueSnapshot {
            name: "sms".into(),
            active: 2,
            waiting: 5,
            completed: 40,
            failed: 1,
            delayed: 3,
        }]));
        let stats = service_with(Arc::new(FlakyStore::new()))
            .with_queue_inspector(Arc::new(queues))
            .get_queue_stats()
            .await;

        assert_eq!(stats.waiting, 5);
        assert_eq!(stats.delayed, 3);
        assert_eq!(stats.jobs["sms"].completed, 40);
        assert_eq!(stats.jobs["analytics"], QueueCounts::default());
    }

    #[tokio::test]
    async fn inspector_failure_zero_fills() {
        let stats = service_with(Arc::new(FlakyStore::new()))
            .with_queue_inspector(Arc::new(StaticQueues(Err(()))))
            .get_queue_stats()
            .await;
        assert_eq!(stats.active, 0);
        assert_eq!(stats.jobs.len(), 4);
    }
}
