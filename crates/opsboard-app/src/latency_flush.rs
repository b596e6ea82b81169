//! API 지연 시간 주기 게시.

use opsboard_monitoring::{LatencyTracker, MonitoringService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// `interval`마다 지연 시간 윈도우 스냅샷을 캐시에 게시
///
/// 종료 신호를 받으면 마지막으로 한 번 더 게시하고 끝낸다.
pub async fn run_latency_flush(
    monitoring: Arc<MonitoringService>,
    latency: Arc<LatencyTracker>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(100)));
    info!("지연 시간 게시 루프 시작 ({}s)", interval.as_secs());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = latency.snapshot();
                debug!("지연 시간 스냅샷: 평균 {}ms, 요청 {}", snapshot.average, snapshot.requests);
                monitoring.publish_api_latency(&snapshot).await;
            }
            _ = shutdown_rx.changed() => {
                monitoring.publish_api_latency(&latency.snapshot()).await;
                info!("지연 시간 게시 루프 종료");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::build_services;
    use opsboard_core::config::AppConfig;

    #[tokio::test(start_paused = true)]
    async fn snapshots_reach_cache_until_shutdown() {
        let mut config = AppConfig::default_config();
        config.storage.in_memory = true;
        let services = build_services(&config).unwrap();
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_latency_flush(
            services.monitoring.clone(),
            services.latency.clone(),
            Duration::from_secs(10),
            rx,
        ));

        services.latency.record(Duration::from_millis(40));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(services.monitoring.get_api_latency().await.requests, 1);

        services.latency.record(Duration::from_millis(60));
        tx.send(true).unwrap();
        handle.await.unwrap();

        let latency = services.monitoring.get_api_latency().await;
        assert_eq!(latency.requests, 2);
        assert_eq!(latency.average, 50.0);
    }
}
