//! 설정 및 DI 와이어링 통합 테스트.
//!
//! 설정 파일 → AppConfig → 어댑터 생성 → 모니터링 서비스 검증.

use opsboard_core::config::AppConfig;
use opsboard_core::config_manager::ConfigManager;
use opsboard_monitor::host::SysInfoHostMonitor;
use opsboard_monitoring::MonitoringService;
use opsboard_storage::cache::MemoryCacheStore;
use opsboard_storage::sqlite::SqliteStore;
use std::sync::Arc;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();

    assert_eq!(config.web.port, 9090);
    assert_eq!(config.cache.ping_timeout_ms, 2000);
    assert_eq!(config.cache.delete_batch_size, 1000);
    assert_eq!(config.monitoring.traffic_days, 7);
    assert_eq!(config.monitoring.queue_names.len(), 4);
}

#[test]
fn config_file_roundtrip_through_manager() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let manager = ConfigManager::with_path(path.clone()).unwrap();
    assert!(path.exists());

    manager
        .update_with(|c| {
            c.web.port = 9191;
            c.cache.delete_batch_size = 250;
        })
        .unwrap();

    let reloaded = ConfigManager::with_path(path).unwrap().get();
    assert_eq!(reloaded.web.port, 9191);
    assert_eq!(reloaded.cache.delete_batch_size, 250);
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"web": {"port": 8088}}"#).unwrap();

    let config = ConfigManager::with_path(path).unwrap().get();
    assert_eq!(config.web.port, 8088);
    assert_eq!(config.monitoring.admin_log_limit, 50);
    assert_eq!(config.cache.latency_stats_key, "api:latency:stats");
}

#[tokio::test]
async fn wired_service_answers_every_probe() {
    let config = AppConfig::default_config();
    let service = MonitoringService::new(
        Arc::new(SqliteStore::open_in_memory().unwrap()),
        Arc::new(SysInfoHostMonitor::new(config.monitoring.disk_stats_enabled)),
        &config,
    )
    .with_cache(Arc::new(MemoryCacheStore::new()));

    assert!(service.get_redis_stats().await.is_connected());
    assert_eq!(service.get_queue_stats().await.jobs.len(), 4);
    assert!(service.get_app_metrics().await.is_ok());
    assert!(service.get_web_metrics().await.is_ok());
    assert!(service.get_user_behavior_metrics().await.is_ok());
    assert!(service.get_engagement_metrics().await.is_ok());
}
