//! 인메모리 키/값 저장소.
//!
//! `CacheStore` 포트 구현. 외부 캐시 서버 없이 단일 프로세스로 실행할 때와 테스트에서 사용한다.
//! INFO 응답은 `key:value` 줄을 `\r\n`으로 구분한다.

use async_trait::async_trait;
use glob::Pattern;
use opsboard_core::error::CoreError;
use opsboard_core::models::cache::CacheStatus;
use opsboard_core::ports::cache::CacheStore;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// 인메모리 캐시: `CacheStore` 포트 구현
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
    status: RwLock<CacheStatus>,
    hits: AtomicU64,
    misses: AtomicU64,
    peak_memory: AtomicU64,
}

impl MemoryCacheStore {
    /// 준비 완료 상태의 빈 캐시
    pub fn new() -> Self {
        Self::with_status(CacheStatus::Ready)
    }

    /// 지정한 연결 상태로 생성
    pub fn with_status(status: CacheStatus) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            status: RwLock::new(status),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            peak_memory: AtomicU64::new(0),
        }
    }

    /// 연결 상태 전이
    pub fn set_status(&self, status: CacheStatus) {
        let mut current = self.status.write();
        if *current != status {
            info!("캐시 상태 전이: {} → {status}", *current);
            *current = status;
        }
    }

    /// 키 수
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn used_memory(entries: &HashMap<String, String>) -> u64 {
        entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }

    fn ensure_ready(&self) -> Result<(), CoreError> {
        let status = *self.status.read();
        if status.accepts_commands() {
            Ok(())
        } else if status.is_closed() {
            Err(CoreError::cache("Connection is closed."))
        } else {
            Err(CoreError::cache(format!(
                "Connection not ready (status: {status})"
            )))
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn status(&self) -> CacheStatus {
        *self.status.read()
    }

    fn client_kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<String, CoreError> {
        self.ensure_ready()?;
        Ok("PONG".to_string())
    }

    async fn info(&self) -> Result<String, CoreError> {
        self.ensure_ready()?;
        let entries = self.entries.lock();
        let used = Self::used_memory(&entries);
        let peak = self.peak_memory.load(Ordering::Relaxed).max(used);

        let lines = [
            "# Server".to_string(),
            "cache_backend:memory".to_string(),
            "# Memory".to_string(),
            format!("used_memory:{used}"),
            format!("used_memory_peak:{peak}"),
            "# Stats".to_string(),
            format!("keyspace_hits:{}", self.hits.load(Ordering::Relaxed)),
            format!("keyspace_misses:{}", self.misses.load(Ordering::Relaxed)),
            "# Keyspace".to_string(),
            format!("db0:keys={}", entries.len()),
        ];
        Ok(lines.join("\r\n") + "\r\n")
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CoreError> {
        self.ensure_ready()?;
        let matcher = Pattern::new(pattern).map_err(|e| CoreError::Validation {
            field: "pattern".to_string(),
            message: e.to_string(),
        })?;

        let entries = self.entries.lock();
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| matcher.matches(k))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.ensure_ready()?;
        let value = self.entries.lock().get(key).cloned();
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.peak_memory
            .fetch_max(Self::used_memory(&entries), Ordering::Relaxed);
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CoreError> {
        self.ensure_ready()?;
        let mut entries = self.entries.lock();
        let removed = keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64;
        debug!("캐시 키 삭제: 요청 {}, 삭제 {removed}", keys.len());
        Ok(removed)
    }

    async fn flush_db(&self) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let mut entries = self.entries.lock();
        let n = entries.len();
        entries.clear();
        info!("캐시 전체 삭제: {n}개 키");
        Ok(())
    }
}
