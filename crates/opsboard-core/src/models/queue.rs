//! 작업 큐 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 큐 하나의 상태별 작업 수 (어댑터가 보고하는 원시 값)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub name: String,
    pub active: u64,
    pub waiting: u64,
    pub completed: u64,
    pub failed: u64,
    pub delayed: u64,
}

/// 큐별 응답 수치
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueCounts {
    pub active: u64,
    pub waiting: u64,
    pub completed: u64,
    pub failed: u64,
}

/// 큐 통계 응답 (전체 합계 + 큐별)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStats {
    pub active: u64,
    pub waiting: u64,
    pub completed: u64,
    pub failed: u64,
    pub delayed: u64,
    pub jobs: BTreeMap<String, QueueCounts>,
}

impl QueueStats {
    /// 설정된 큐 이름을 0으로 채우고 스냅샷을 합산
    ///
    /// 설정에 없는 큐도 스냅샷에 있으면 포함된다.
    pub fn from_snapshots(queue_names: &[String], snapshots: &[QueueSnapshot]) -> Self {
        let mut stats = QueueStats {
            jobs: queue_names
                .iter()
                .map(|name| (name.clone(), QueueCounts::default()))
                .collect(),
            ..Default::default()
        };

        for snap in snapshots {
            stats.active += snap.active;
            stats.waiting += snap.waiting;
            stats.completed += snap.completed;
            stats.failed += snap.failed;
            stats.delayed += snap.delayed;

            let entry = stats.jobs.entry(snap.name.clone()).or_default();
            entry.active += snap.active;
            entry.waiting += snap.waiting;
            entry.completed += snap.completed;
            entry.failed += snap.failed;
        }

        stats
    }
}
