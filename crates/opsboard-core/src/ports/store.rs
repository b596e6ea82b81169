//! 관계형 저장소 포트.
//!
//! 구현: `opsboard-storage::sqlite::SqliteStore` (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::query::{
    AggregateSpec, Entity, Filter, FindQuery, GroupByQuery, GroupRow, NativeQuery, Row,
};
use crate::models::store::ConnectionStats;

/// 범용 관계형 저장소 조회
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// 필터에 맞는 레코드 수
    async fn count(&self, entity: Entity, filter: &Filter) -> Result<u64, CoreError>;

    /// 레코드 조회 (정렬/제한/선택/포함)
    async fn find_many(&self, query: &FindQuery) -> Result<Vec<Row>, CoreError>;

    /// 필드 기준 그룹 집계
    async fn group_by(&self, query: &GroupByQuery) -> Result<Vec<GroupRow>, CoreError>;

    /// 단일 집계값 (레코드가 없으면 None)
    async fn aggregate(
        &self,
        entity: Entity,
        spec: AggregateSpec,
        filter: &Filter,
    ) -> Result<Option<f64>, CoreError>;

    /// 엔진 전용 introspection 쿼리
    async fn native_query(&self, query: NativeQuery) -> Result<Vec<Row>, CoreError>;

    /// 연결 상태 (풀이 없는 어댑터는 기본값)
    fn connection_stats(&self) -> ConnectionStats {
        ConnectionStats::default()
    }
}
