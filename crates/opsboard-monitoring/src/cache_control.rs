//! 캐시 삭제와 키 통계.
//!
//! `clear_cache`는 이 서비스의 유일한 파괴적 연산이다. 패턴이 있으면 일치하는 키만
//! 배치 단위로 순차 삭제하고, 없으면 현재 DB를 비운다.

use opsboard_core::error::{describe_error, CoreError};
use opsboard_core::models::cache::{CacheKeyStats, ClearCacheResult, Cleared};
use opsboard_core::ports::cache::CacheStore;
use tracing::{error, info, warn};

use crate::error::MonitoringError;
use crate::MonitoringService;

const NO_CLIENT: &str = "Cache client not available";

impl MonitoringService {
    /// 패턴에 맞는 키 또는 전체 캐시 삭제
    ///
    /// 앞뒤 공백을 제거한 패턴이 비어 있으면 전체 삭제로 취급한다.
    pub async fn clear_cache(
        &self,
        pattern: Option<&str>,
    ) -> Result<ClearCacheResult, MonitoringError> {
        let Some(cache) = &self.cache else {
            return Err(MonitoringError::CacheUnavailable(NO_CLIENT.to_string()));
        };

        let status = cache.status();
        if !status.accepts_commands() {
            warn!(status = %status, "캐시 미연결 상태에서 삭제 요청 거부");
            return Err(MonitoringError::CacheUnavailable(format!(
                "Cache is not connected. Status: {status}"
            )));
        }

        let pattern = pattern.map(str::trim).filter(|p| !p.is_empty());
        let result = match pattern {
            Some(p) => self.clear_matching(cache.as_ref(), p).await,
            None => cache.flush_db().await.map(|()| ClearCacheResult {
                cleared: Cleared::All,
                pattern: "*".to_string(),
                message: "All cache cleared successfully".to_string(),
            }),
        };

        result.map_err(|e| {
            let desc = describe_error(&e);
            error!(
                status = %cache.status(),
                code = desc.code.as_deref().unwrap_or("NO_CODE"),
                client = cache.client_kind(),
                "캐시 삭제 실패: {}",
                desc.message
            );
            MonitoringError::ClearCache(desc.message)
        })
    }

    async fn clear_matching(
        &self,
        cache: &dyn CacheStore,
        pattern: &str,
    ) -> Result<ClearCacheResult, CoreError> {
        let keys = cache.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(ClearCacheResult {
                cleared: Cleared::Count(0),
                pattern: pattern.to_string(),
                message: format!("No keys found matching pattern \"{pattern}\""),
            });
        }

        // 대량 삭제 부하를 제한하기 위해 배치는 순차 실행
        for batch in keys.chunks(self.cache_config.delete_batch_size.max(1)) {
            cache.del(batch).await?;
        }

        info!("캐시 키 {}개 삭제 (패턴: {pattern})", keys.len());
        Ok(ClearCacheResult {
            cleared: Cleared::Count(keys.len() as u64),
            pattern: pattern.to_string(),
            message: format!("Cleared {} keys matching pattern \"{pattern}\"", keys.len()),
        })
    }

    /// 전체 키 수와 캐시 헬스
    pub async fn get_cache_stats(&self) -> CacheKeyStats {
        let Some(cache) = &self.cache else {
            return CacheKeyStats::Unavailable {
                total_keys: 0,
                error: NO_CLIENT.to_string(),
            };
        };

        match cache.keys("*").await {
            Ok(keys) => CacheKeyStats::Available {
                total_keys: keys.len() as u64,
                memory: self.get_redis_stats().await,
            },
            Err(e) => {
                warn!("캐시 키 통계 실패: {e}");
                CacheKeyStats::Unavailable {
                    total_keys: 0,
                    error: describe_error(&e).message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{service_with, FlakyStore, ScriptedCache};
    use assert_matches::assert_matches;
    use opsboard_core::models::cache::CacheStatus;
    use std::sync::Arc;

    fn service(cache: Arc<ScriptedCache>) -> MonitoringService {
        service_with(Arc::new(FlakyStore::new())).with_cache(cache)
    }

    #[tokio::test]
    async fn large_key_sets_are_deleted_in_batches() {
        let cache = Arc::new(ScriptedCache::ready().with_keys(2500));
        let result = service(cache.clone())
            .clear_cache(Some("session:*"))
            .await
            .unwrap();

        assert_eq!(*cache.del_batches.lock(), vec![1000, 1000, 500]);
        assert_eq!(result.cleared, Cleared::Count(2500));
        assert_eq!(result.pattern, "session:*");
        assert_eq!(result.message, "Cleared 2500 keys matching pattern \"session:*\"");
    }

    #[tokio::test]
    async fn no_matches_skip_delete() {
        let cache = Arc::new(ScriptedCache::ready());
        let result = service(cache.clone())
            .clear_cache(Some("  temp:*  "))
            .await
            .unwrap();

        assert!(cache.del_batches.lock().is_empty());
        assert_eq!(result.cleared, Cleared::Count(0));
        assert_eq!(result.message, "No keys found matching pattern \"temp:*\"");
    }

    #[tokio::test]
    async fn blank_pattern_flushes_everything() {
        let cache = Arc::new(ScriptedCache::ready().with_keys(3));
        let result = service(cache.clone()).clear_cache(Some("   ")).await.unwrap();

        assert_eq!(*cache.flushes.lock(), 1);
        assert!(cache.del_batches.lock().is_empty());
        assert_eq!(result.cleared, Cleared::All);
        assert_eq!(result.pattern, "*");
        assert_eq!(
            serde_json::to_value(&result).unwrap()["cleared"],
            serde_json::json!("all")
        );
    }

    #[tokio::test]
    async fn closed_cache_is_unavailable() {
        let cache = Arc::new(ScriptedCache::ready().with_status(CacheStatus::Reconnecting));
        let err = service(cache.clone()).clear_cache(None).await.unwrap_err();

        assert_matches!(err, MonitoringError::CacheUnavailable(ref m) if m.contains("Status: reconnecting"));
        assert_eq!(err.to_string(), "Failed to clear cache: Cache is not connected. Status: reconnecting");
        assert_eq!(*cache.flushes.lock(), 0);
    }

    #[tokio::test]
    async fn missing_client_is_unavailable() {
        let err = service_with(Arc::new(FlakyStore::new()))
            .clear_cache(Some("*"))
            .await
            .unwrap_err();
        assert_matches!(err, MonitoringError::CacheUnavailable(_));
    }

    #[tokio::test]
    async fn delete_failure_is_wrapped() {
        let mut cache = ScriptedCache::ready().with_keys(5);
        cache.fail_del = true;
        let err = service(Arc::new(cache))
            .clear_cache(Some("session:*"))
            .await
            .unwrap_err();

        assert_matches!(err, MonitoringError::ClearCache(ref m) if m == "READONLY replica");
    }

    #[tokio::test]
    async fn key_stats() {
        let svc = service(Arc::new(ScriptedCache::ready().with_keys(4)));
        assert_matches!(
            svc.get_cache_stats().await,
            CacheKeyStats::Available { total_keys: 4, memory } if memory.is_connected()
        );

        let mut failing = ScriptedCache::ready();
        failing.fail_keys = true;
        assert_matches!(
            service(Arc::new(failing)).get_cache_stats().await,
            CacheKeyStats::Unavailable { total_keys: 0, ref error } if error == "KEYS is disabled"
        );

        assert_matches!(
            service_with(Arc::new(FlakyStore::new())).get_cache_stats().await,
            CacheKeyStats::Unavailable { ref error, .. } if error == "Cache client not available"
        );
    }
}
