//! 인프로세스 작업 큐 레지스트리.
//!
//! `QueueInspector` 포트 구현. 백그라운드 작업을 처리하는 쪽이 상태 전이를 기록하고,
//! 모니터링 서비스는 스냅샷만 읽는다.

use async_trait::async_trait;
use opsboard_core::error::CoreError;
use opsboard_core::models::queue::QueueSnapshot;
use opsboard_core::ports::queue::QueueInspector;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 큐 하나의 카운터
#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    active: u64,
    waiting: u64,
    completed: u64,
    failed: u64,
    delayed: u64,
}

/// 이름별 작업 큐 카운터: `QueueInspector` 포트 구현
///
/// 전이: `enqueue`(waiting+1) → `start`(waiting-1, active+1) → `complete`/`fail`(active-1).
/// `delay`는 waiting → delayed, `promote`는 delayed → waiting.
#[derive(Debug, Default)]
pub struct JobQueueRegistry {
    queues: RwLock<BTreeMap<String, Counters>>,
}

impl JobQueueRegistry {
    /// 빈 레지스트리
    pub fn new() -> Self {
        Self::default()
    }

    /// 큐 이름을 미리 등록한 레지스트리
    pub fn with_queues<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        {
            let mut queues = registry.queues.write();
            for name in names {
                queues.entry(name.into()).or_default();
            }
        }
        registry
    }

    fn update(&self, queue: &str, f: impl FnOnce(&mut Counters)) {
        let mut queues = self.queues.write();
        let counters = queues.entry(queue.to_string()).or_default();
        f(counters);
    }

    /// 작업 추가
    pub fn enqueue(&self, queue: &str) {
        self.update(queue, |c| c.waiting += 1);
        debug!("작업 추가: {queue}");
    }

    /// 대기 → 실행
    pub fn start(&self, queue: &str) {
        self.update(queue, |c| {
            if c.waiting == 0 {
                warn!("대기 작업 없이 실행 기록: {queue}");
            }
            c.waiting = c.waiting.saturating_sub(1);
            c.active += 1;
        });
    }

    /// 실행 → 완료
    pub fn complete(&self, queue: &str) {
        self.update(queue, |c| {
            c.active = c.active.saturating_sub(1);
            c.completed += 1;
        });
    }

    /// 실행 → 실패
    pub fn fail(&self, queue: &str) {
        self.update(queue, |c| {
            c.active = c.active.saturating_sub(1);
            c.failed += 1;
        });
    }

    /// 대기 → 지연
    pub fn delay(&self, queue: &str) {
        self.update(queue, |c| {
            c.waiting = c.waiting.saturating_sub(1);
            c.delayed += 1;
        });
    }

    /// 지연 → 대기
    pub fn promote(&self, queue: &str) {
        self.update(queue, |c| {
            c.delayed = c.delayed.saturating_sub(1);
            c.waiting += 1;
        });
    }
}

#[async_trait]
impl QueueInspector for JobQueueRegistry {
    async fn snapshots(&self) -> Result<Vec<QueueSnapshot>, CoreError> {
        let queues = self.queues.read();
        Ok(queues
            .iter()
            .map(|(name, c)| QueueSnapshot {
                name: name.clone(),
                active: c.active,
                waiting: c.waiting,
                completed: c.completed,
                failed: c.failed,
                delayed: c.delayed,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lifecycle_transitions() {
        let registry = JobQueueRegistry::with_queues(["email", "sms"]);
        registry.enqueue("email");
        registry.enqueue("email");
        registry.enqueue("email");
        registry.start("email");
        registry.start("email");
        registry.complete("email");
        registry.fail("email");
        registry.delay("email");

        let snaps = registry.snapshots().await.unwrap();
        let email = snaps.iter().find(|s| s.name == "email").unwrap();
        assert_eq!(email.active, 0);
        assert_eq!(email.waiting, 0);
        assert_eq!(email.completed, 1);
        assert_eq!(email.failed, 1);
        assert_eq!(email.delayed, 1);

        let sms = snaps.iter().find(|s| s.name == "sms").unwrap();
        assert_eq!(sms.waiting, 0);
    }

    #[tokio::test]
    async fn unknown_queue_registered_on_first_use() {
        let registry = JobQueueRegistry::new();
        registry.enqueue("reports");
        registry.promote("reports");

        let snaps = registry.snapshots().await.unwrap();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].name, "reports");
        assert_eq!(snaps[0].waiting, 2);
        assert_eq!(snaps[0].delayed, 0);
    }

    #[tokio::test]
    async fn counters_never_underflow() {
        let registry = JobQueueRegistry::new();
        registry.complete("email");
        registry.start("email");

        let snaps = registry.snapshots().await.unwrap();
        assert_eq!(snaps[0].active, 1);
        assert_eq!(snaps[0].completed, 1);
        assert_eq!(snaps[0].waiting, 0);
    }
}
