//! 캐시(키/값) 저장소 포트.
//!
//! 구현: `opsboard-storage::cache::MemoryCacheStore`

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::cache::CacheStatus;

/// 캐시 클라이언트
///
/// `status()`는 드라이버의 연결 라이프사이클 상태를 그대로 노출한다.
/// "connected" 불리언이 연결/종료 전이 중에 신뢰할 수 없으므로 프로브는 이 값을 먼저 본다.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 연결 라이프사이클 상태
    fn status(&self) -> CacheStatus;

    /// 클라이언트 종류 (진단 로그용)
    fn client_kind(&self) -> &'static str;

    /// PING: 정상이면 "PONG"
    async fn ping(&self) -> Result<String, CoreError>;

    /// INFO: 줄 단위 `key:value` 텍스트
    async fn info(&self) -> Result<String, CoreError>;

    /// 패턴에 맞는 키 목록
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CoreError>;

    /// 값 조회
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장
    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 키 삭제, 삭제된 개수 반환
    async fn del(&self, keys: &[String]) -> Result<u64, CoreError>;

    /// 현재 DB 전체 삭제
    async fn flush_db(&self) -> Result<(), CoreError>;
}
