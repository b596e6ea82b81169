//! 어댑터 생성과 서비스 조립 (DI 와이어링).

use anyhow::{Context, Result};
use opsboard_core::config::{AppConfig, StorageConfig};
use opsboard_core::config_manager::ConfigManager;
use opsboard_monitor::host::SysInfoHostMonitor;
use opsboard_monitor::job_queue::JobQueueRegistry;
use opsboard_monitoring::{LatencyTracker, MonitoringService};
use opsboard_storage::cache::MemoryCacheStore;
use opsboard_storage::sqlite::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 조립된 서비스와 공유 어댑터
pub struct Services {
    pub monitoring: Arc<MonitoringService>,
    pub latency: Arc<LatencyTracker>,
}

/// 데이터베이스 경로 결정 (설정 → 플랫폼 데이터 디렉토리 → 현재 디렉토리)
pub fn resolve_db_path(storage: &StorageConfig) -> PathBuf {
    let dir = storage.data_dir.clone().unwrap_or_else(|| {
        ConfigManager::data_dir().unwrap_or_else(|e| {
            warn!("데이터 디렉토리 확인 실패, 현재 디렉토리 사용: {e}");
            PathBuf::from(".")
        })
    });
    dir.join(&storage.db_file_name)
}

fn open_store(storage: &StorageConfig) -> Result<SqliteStore> {
    if storage.in_memory {
        info!("인메모리 SQLite 사용");
        return SqliteStore::open_in_memory().context("인메모리 SQLite 생성 실패");
    }

    let path = resolve_db_path(storage);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("데이터 디렉토리 생성 실패: {}", parent.display()))?;
        }
    }
    info!("SQLite 경로: {}", path.display());
    SqliteStore::open(&path).with_context(|| format!("SQLite 열기 실패: {}", path.display()))
}

/// 설정으로 모든 어댑터를 만들고 모니터링 서비스에 주입
pub fn build_services(config: &AppConfig) -> Result<Services> {
    let store = Arc::new(open_store(&config.storage)?);
    let host = Arc::new(SysInfoHostMonitor::new(config.monitoring.disk_stats_enabled));
    let cache = Arc::new(MemoryCacheStore::new());
    let queues = Arc::new(JobQueueRegistry::with_queues(
        config.monitoring.queue_names.clone(),
    ));

    let monitoring = MonitoringService::new(store, host, config)
        .with_cache(cache)
        .with_queue_inspector(queues);

    Ok(Services {
        monitoring: Arc::new(monitoring),
        latency: Arc::new(LatencyTracker::new(config.monitoring.latency_window)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_uses_configured_dir() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/var/lib/opsboard")),
            ..StorageConfig::default()
        };
        assert_eq!(
            resolve_db_path(&storage),
            PathBuf::from("/var/lib/opsboard/opsboard.db")
        );
    }

    #[test]
    fn file_store_is_created_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default_config();
        config.storage.data_dir = Some(dir.path().join("nested"));

        let services = build_services(&config).unwrap();
        assert!(dir.path().join("nested").join("opsboard.db").exists());
        assert_eq!(
            services.monitoring.config().queue_names,
            config.monitoring.queue_names
        );
    }

    #[tokio::test]
    async fn in_memory_services_answer_probes() {
        let mut config = AppConfig::default_config();
        config.storage.in_memory = true;

        let services = build_services(&config).unwrap();

        assert!(services.monitoring.get_redis_stats().await.is_connected());
        let queues = services.monitoring.get_queue_stats().await;
        assert_eq!(queues.jobs.len(), 4);
        assert_eq!(queues.waiting, 0);
    }
}
