//! 캐시 헬스 프로브.
//!
//! 연결 상태 확인 → 타임아웃 ping → INFO 파싱 → 키 수 순서로 진행한다.
//! 어떤 단계에서 실패해도 호출자에게 에러를 전파하지 않고 `CacheStats::Disconnected`로 돌려준다.

use opsboard_core::error::{describe_error, CoreError};
use opsboard_core::models::cache::{CacheHealth, CacheStats};
use opsboard_core::models::percent;
use opsboard_core::ports::cache::CacheStore;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::MonitoringService;

/// 클라이언트가 주입되지 않았을 때의 진단 메시지
pub const MISSING_CLIENT: &str =
    "Cache client not available - check cache module configuration. No cache client was injected.";

/// INFO 응답의 `key:value` 줄에서 메모리/적중 카운터 추출
///
/// 없는 줄이나 숫자가 아닌 값은 0으로 취급한다.
pub fn parse_info(info: &str) -> CacheHealth {
    let mut health = CacheHealth::default();

    for line in info.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match key {
            "used_memory" => &mut health.memory.used,
            "used_memory_peak" => &mut health.memory.peak,
            "keyspace_hits" => &mut health.hits,
            "keyspace_misses" => &mut health.misses,
            _ => continue,
        };
        *slot = leading_integer(value);
    }

    health.hit_rate = percent(
        health.hits as f64,
        (health.hits.saturating_add(health.misses)) as f64,
    );
    health
}

/// 앞쪽 숫자만 읽는다 ("1024\r" → 1024, "abc" → 0)
fn leading_integer(value: &str) -> u64 {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

impl MonitoringService {
    /// 캐시 헬스 프로브
    pub async fn get_redis_stats(&self) -> CacheStats {
        let Some(cache) = &self.cache else {
            warn!("캐시 프로브: 클라이언트 없음");
            return CacheStats::disconnected(MISSING_CLIENT, None);
        };

        match self.probe_cache(cache.as_ref()).await {
            Ok(stats) => stats,
            Err(e) => {
                let desc = describe_error(&e);
                let status = cache.status();
                error!(
                    status = %status,
                    code = desc.code.as_deref().unwrap_or("NO_CODE"),
                    client = cache.client_kind(),
                    stack = desc.stack.as_deref().unwrap_or(""),
                    "캐시 프로브 실패: {}",
                    desc.message
                );

                let code_info = desc
                    .code
                    .map(|c| format!(" Code: {c}."))
                    .unwrap_or_default();
                CacheStats::disconnected(
                    format!(
                        "{}{code_info} Status: {status}. Please ensure the cache server is running and accessible at the configured host/port.",
                        desc.message
                    ),
                    Some(status.as_str()),
                )
            }
        }
    }

    async fn probe_cache(&self, cache: &dyn CacheStore) -> Result<CacheStats, CoreError> {
        // 드라이버의 connected 플래그는 전이 중에 믿을 수 없으므로 상태를 먼저 본다
        let status = cache.status();

        if status.is_closed() {
            return Ok(CacheStats::disconnected(
                format!(
                    "Cache connection closed. Status: {status}. Please check if the cache server is running."
                ),
                None,
            ));
        }

        if status.is_pending() {
            return Ok(CacheStats::disconnected(
                format!(
                    "Cache is connecting... Status: {status}. Please wait a moment and refresh."
                ),
                None,
            ));
        }

        let ping_timeout = self.cache_config.ping_timeout();
        let ping = match timeout(ping_timeout, cache.ping()).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                timeout_ms: self.cache_config.ping_timeout_ms,
            }),
        };

        match ping {
            Ok(pong) if pong == "PONG" => {}
            Ok(pong) => {
                warn!(status = %status, client = cache.client_kind(), "비정상 ping 응답: {pong}");
                return Ok(CacheStats::disconnected(
                    format!(
                        "Cache ping failed - received: {pong} instead of PONG. Status: {status}. Connection may be unstable."
                    ),
                    Some(status.as_str()),
                ));
            }
            Err(e) => {
                let desc = describe_error(&e);
                warn!(
                    status = %status,
                    code = desc.code.as_deref().unwrap_or("NO_CODE"),
                    client = cache.client_kind(),
                    "캐시 ping 실패: {}",
                    desc.message
                );
                return Ok(CacheStats::disconnected(
                    format!(
                        "Cache ping failed: {}. Check cache server connection. Status: {status}",
                        desc.message
                    ),
                    Some(status.as_str()),
                ));
            }
        }

        let info = cache.info().await?;
        let mut health = parse_info(&info);

        health.keys = match cache.keys("*").await {
            Ok(keys) => keys.len() as u64,
            Err(e) => {
                warn!("캐시 키 수 조회 실패, 0으로 보고: {e}");
                0
            }
        };

        debug!(
            "캐시 프로브: 키 {}, 메모리 {}B, 적중률 {:.1}%",
            health.keys, health.memory.used, health.hit_rate
        );
        Ok(CacheStats::Connected(health))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{service_with, FlakyStore, PingReply, ScriptedCache};
    use assert_matches::assert_matches;
    use opsboard_core::models::cache::CacheStatus;
    use std::sync::Arc;
    use std::time::Duration;

    fn service(cache: Arc<ScriptedCache>) -> MonitoringService {
        service_with(Arc::new(FlakyStore::new())).with_cache(cache)
    }

    #[test]
    fn parses_info_lines() {
        let health = parse_info(
            "# Memory\r\nused_memory:1024\r\nused_memory_peak:4096\r\n# Stats\r\nkeyspace_hits:30\r\nkeyspace_misses:10\r\n",
        );
        assert_eq!(health.memory.used, 1024);
        assert_eq!(health.memory.peak, 4096);
        assert_eq!(health.hits, 30);
        assert_eq!(health.misses, 10);
        assert_eq!(health.hit_rate, 75.0);
    }

    #[test]
    fn missing_info_lines_are_zero() {
        let health = parse_info("# Server\r\nredis_version:7.2.0\r\nused_memory:garbage\r\n");
        assert_eq!(health.memory.used, 0);
        assert_eq!(health.hits, 0);
        assert_eq!(health.hit_rate, 0.0);
    }

    #[tokio::test]
    async fn absent_client_is_disconnected() {
        let svc = service_with(Arc::new(FlakyStore::new()));
        let stats = svc.get_redis_stats().await;
        assert_matches!(stats, CacheStats::Disconnected(f) if f.error.contains("not available"));
    }

    #[tokio::test]
    async fn ended_client_is_not_pinged() {
        let cache = Arc::new(ScriptedCache::ready().with_status(CacheStatus::End));
        let stats = service(cache.clone()).get_redis_stats().await;

        assert_matches!(stats, CacheStats::Disconnected(f) if f.error.contains("end"));
        assert_eq!(*cache.pings.lock(), 0);
    }

    #[tokio::test]
    async fn connecting_client_reports_status() {
        let cache = Arc::new(ScriptedCache::ready().with_status(CacheStatus::Connecting));
        let stats = service(cache.clone()).get_redis_stats().await;

        assert_matches!(stats, CacheStats::Disconnected(f) if f.error.contains("connecting"));
        assert_eq!(*cache.pings.lock(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_ping_times_out() {
        let cache = Arc::new(ScriptedCache::ready().with_ping(PingReply::Hang));
        let svc = service(cache);

        let started = tokio::time::Instant::now();
        let stats = svc.get_redis_stats().await;
        let elapsed = started.elapsed();

        assert_matches!(
            stats,
            CacheStats::Disconnected(ref f) if f.error.contains("Ping timeout after 2000ms")
                && f.status.as_deref() == Some("ready")
        );
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unexpected_reply_is_reported() {
        let cache = Arc::new(ScriptedCache::ready().with_ping(PingReply::Reply("LOADING".into())));
        let stats = service(cache).get_redis_stats().await;
        assert_matches!(stats, CacheStats::Disconnected(f) if f.error.contains("received: LOADING"));
    }

    #[tokio::test]
    async fn unexpected_reply_carries_status() {
        let cache = Arc::new(ScriptedCache::ready().with_ping(PingReply::Reply("LOADING".into())));
        let stats = service(cache).get_redis_stats().await;
        assert_matches!(
            stats,
            CacheStats::Disconnected(f) if f.status.as_deref() == Some("ready")
                && f.error.contains("Status: ready")
        );
    }

    #[tokio::test]
    async fn ping_error_carries_status() {
        let cache = Arc::new(ScriptedCache::ready().with_ping(PingReply::Fail(
            "connect ECONNREFUSED 127.0.0.1:6379".into(),
            Some("ECONNREFUSED".into()),
        )));
        let stats = service(cache).get_redis_stats().await;
        assert_matches!(
            stats,
            CacheStats::Disconnected(f) if f.error.contains("ECONNREFUSED")
                && f.status.as_deref() == Some("ready")
        );
    }

    #[tokio::test]
    async fn connected_stats_tolerate_key_listing_failure() {
        let mut cache = ScriptedCache::ready().with_keys(5);
        cache.fail_keys = true;
        let stats = service(Arc::new(cache)).get_redis_stats().await;

        let CacheStats::Connected(health) = stats else {
            panic!("expected connected stats");
        };
        assert_eq!(health.keys, 0);
        assert_eq!(health.memory.used, 1024);
        assert_eq!(health.hit_rate, 75.0);
    }

    #[tokio::test]
    async fn connected_stats_count_keys() {
        let cache = Arc::new(ScriptedCache::ready().with_keys(12));
        let stats = service(cache).get_redis_stats().await;
        assert_matches!(stats, CacheStats::Connected(h) if h.keys == 12 && h.memory.peak == 2048);
    }
}
