//! 단위 테스트용 가짜 협력 객체.

use async_trait::async_trait;
use opsboard_core::config::AppConfig;
use opsboard_core::error::CoreError;
use opsboard_core::models::cache::CacheStatus;
use opsboard_core::models::host::HostSample;
use opsboard_core::models::query::{
    AggregateSpec, Entity, Filter, FindQuery, GroupByQuery, GroupRow, NativeQuery, Row,
};
use opsboard_core::models::store::ConnectionStats;
use opsboard_core::ports::cache::CacheStore;
use opsboard_core::ports::host::HostMonitor;
use opsboard_core::ports::store::RelationalStore;
use opsboard_storage::sqlite::SqliteStore;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::MonitoringService;

/// 고정 샘플을 돌려주는 호스트
pub struct FixedHost(pub HostSample);

impl HostMonitor for FixedHost {
    fn sample(&self) -> HostSample {
        self.0.clone()
    }
}

/// ping 동작
#[derive(Clone)]
pub enum PingReply {
    Pong,
    Reply(String),
    /// 응답하지 않음
    Hang,
    Fail(String, Option<String>),
}

/// 호출을 기록하는 캐시
pub struct ScriptedCache {
    pub status: Mutex<CacheStatus>,
    pub ping: PingReply,
    pub info: String,
    pub keys: Vec<String>,
    pub fail_keys: bool,
    pub fail_del: bool,
    pub pings: Mutex<u32>,
    pub del_batches: Mutex<Vec<usize>>,
    pub flushes: Mutex<u32>,
}

impl ScriptedCache {
    pub fn ready() -> Self {
        Self {
            status: Mutex::new(CacheStatus::Ready),
            ping: PingReply::Pong,
            info: "used_memory:1024\r\nused_memory_peak:2048\r\nkeyspace_hits:3\r\nkeyspace_misses:1\r\n"
                .to_string(),
            keys: Vec::new(),
            fail_keys: false,
            fail_del: false,
            pings: Mutex::new(0),
            del_batches: Mutex::new(Vec::new()),
            flushes: Mutex::new(0),
        }
    }

    pub fn with_status(self, status: CacheStatus) -> Self {
        *self.status.lock() = status;
        self
    }

    pub fn with_ping(mut self, ping: PingReply) -> Self {
        self.ping = ping;
        self
    }

    pub fn with_keys(mut self, n: usize) -> Self {
        self.keys = (0..n).map(|i| format!("session:{i}")).collect();
        self
    }
}

#[async_trait]
impl CacheStore for ScriptedCache {
    fn status(&self) -> CacheStatus {
        *self.status.lock()
    }

    fn client_kind(&self) -> &'static str {
        "scripted"
    }

    async fn ping(&self) -> Result<String, CoreError> {
        *self.pings.lock() += 1;
        match &self.ping {
            PingReply::Pong => Ok("PONG".to_string()),
            PingReply::Reply(s) => Ok(s.clone()),
            PingReply::Hang => {
                futures::future::pending::<()>().await;
                Ok("PONG".to_string())
            }
            PingReply::Fail(message, code) => Err(CoreError::Cache {
                message: message.clone(),
                code: code.clone(),
            }),
        }
    }

    async fn info(&self) -> Result<String, CoreError> {
        Ok(self.info.clone())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CoreError> {
        if self.fail_keys {
            return Err(CoreError::cache("KEYS is disabled"));
        }
        Ok(self.keys.clone())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), CoreError> {
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CoreError> {
        if self.fail_del {
            return Err(CoreError::cache_with_code("READONLY replica", "READONLY"));
        }
        self.del_batches.lock().push(keys.len());
        Ok(keys.len() as u64)
    }

    async fn flush_db(&self) -> Result<(), CoreError> {
        *self.flushes.lock() += 1;
        Ok(())
    }
}

/// SQLite 저장소를 감싸고 일부 쿼리를 실패시키는 저장소
pub struct FlakyStore {
    pub inner: SqliteStore,
    pub fail_native: bool,
    pub fail_counts: bool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            fail_native: false,
            fail_counts: false,
        }
    }
}

#[async_trait]
impl RelationalStore for FlakyStore {
    async fn count(&self, entity: Entity, filter: &Filter) -> Result<u64, CoreError> {
        if self.fail_counts {
            return Err(CoreError::Store("connection refused".to_string()));
        }
        self.inner.count(entity, filter).await
    }

    async fn find_many(&self, query: &FindQuery) -> Result<Vec<Row>, CoreError> {
        self.inner.find_many(query).await
    }

    async fn group_by(&self, query: &GroupByQuery) -> Result<Vec<GroupRow>, CoreError> {
        self.inner.group_by(query).await
    }

    async fn aggregate(
        &self,
        entity: Entity,
        spec: AggregateSpec,
        filter: &Filter,
    ) -> Result<Option<f64>, CoreError> {
        self.inner.aggregate(entity, spec, filter).await
    }

    async fn native_query(&self, query: NativeQuery) -> Result<Vec<Row>, CoreError> {
        if self.fail_native {
            return Err(CoreError::Store("permission denied for dbstat".to_string()));
        }
        self.inner.native_query(query).await
    }

    fn connection_stats(&self) -> ConnectionStats {
        self.inner.connection_stats()
    }
}

/// 빈 저장소 + 고정 호스트 서비스
pub fn service_with(store: Arc<dyn RelationalStore>) -> MonitoringService {
    MonitoringService::new(
        store,
        Arc::new(FixedHost(HostSample::default())),
        &AppConfig::default_config(),
    )
}
