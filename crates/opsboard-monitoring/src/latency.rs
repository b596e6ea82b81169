//! API 지연 시간.
//!
//! 웹 레이어가 요청마다 [`LatencyTracker::record`]로 소요 시간을 남기고, 백그라운드 작업이
//! 주기적으로 스냅샷을 캐시에 게시한다. 대시보드는 캐시에 게시된 값을 읽는다.

use opsboard_core::models::analytics::ApiLatency;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::MonitoringService;

/// 최근 N개 요청의 지연 시간 윈도우
pub struct LatencyTracker {
    window: usize,
    samples: Mutex<VecDeque<f64>>,
    total: AtomicU64,
}

impl LatencyTracker {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: Mutex::new(VecDeque::with_capacity(window)),
            total: AtomicU64::new(0),
        }
    }

    /// 요청 하나의 소요 시간 기록
    pub fn record(&self, elapsed: Duration) {
        let ms = elapsed.as_micros() as f64 / 1000.0;
        let mut samples = self.samples.lock();
        if samples.len() == self.window {
            samples.pop_front();
        }
        samples.push_back(ms);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// 현재 윈도우 요약 (`requests`는 누적 요청 수)
    pub fn snapshot(&self) -> ApiLatency {
        let samples: Vec<f64> = self.samples.lock().iter().copied().collect();
        summarize(samples, self.total.load(Ordering::Relaxed))
    }
}

/// 정렬된 샘플에서 nearest-rank 백분위수
fn nearest_rank(sorted: &[f64], pct: f64) -> f64 {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// 샘플 → 평균/p50/p95/p99 (빈 윈도우면 0)
pub fn summarize(mut samples: Vec<f64>, requests: u64) -> ApiLatency {
    if samples.is_empty() {
        return ApiLatency {
            requests,
            ..ApiLatency::default()
        };
    }

    samples.sort_by(f64::total_cmp);
    let average = samples.iter().sum::<f64>() / samples.len() as f64;

    ApiLatency {
        average: round2(average),
        p50: round2(nearest_rank(&samples, 50.0)),
        p95: round2(nearest_rank(&samples, 95.0)),
        p99: round2(nearest_rank(&samples, 99.0)),
        requests,
    }
}

impl MonitoringService {
    /// 캐시에 게시된 지연 시간 스냅샷
    ///
    /// 캐시가 없거나 키가 없거나 JSON이 깨져 있으면 0으로 채운다.
    pub async fn get_api_latency(&self) -> ApiLatency {
        let Some(cache) = &self.cache else {
            return ApiLatency::default();
        };

        match cache.get(&self.cache_config.latency_stats_key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("지연 시간 스냅샷 파싱 실패: {e}");
                ApiLatency::default()
            }),
            Ok(None) => ApiLatency::default(),
            Err(e) => {
                warn!("지연 시간 스냅샷 조회 실패: {e}");
                ApiLatency::default()
            }
        }
    }

    /// 지연 시간 스냅샷을 캐시에 게시 (캐시가 없으면 건너뜀)
    pub async fn publish_api_latency(&self, latency: &ApiLatency) {
        let Some(cache) = &self.cache else {
            return;
        };

        let raw = match serde_json::to_string(latency) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("지연 시간 직렬화 실패: {e}");
                return;
            }
        };

        match cache.set(&self.cache_config.latency_stats_key, &raw).await {
            Ok(()) => debug!("지연 시간 게시: {} 요청", latency.requests),
            Err(e) => warn!("지연 시간 게시 실패: {e}"),
        }
    }
}
