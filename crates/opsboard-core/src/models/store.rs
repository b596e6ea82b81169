//! 관계형 저장소 성능 모델.

use serde::{Deserialize, Serialize};

/// DB 성능 프로브 결과
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DbPerformance {
    /// 기본 쿼리 성공
    Measured {
        #[serde(rename = "queryTime")]
        query_time: u64,
        /// 크기 순 상위 테이블 (best-effort, 빈 배열 가능)
        #[serde(rename = "tableSizes")]
        table_sizes: Vec<TableSize>,
        connections: ConnectionStats,
    },
    /// 기본 쿼리 실패: 실패까지 걸린 시간 포함
    Failed {
        #[serde(rename = "queryTime")]
        query_time: u64,
        error: String,
    },
}

/// 테이블 크기 (엔진 introspection 결과)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSize {
    pub tablename: String,
    /// 사람이 읽는 크기 ("16 kB")
    pub size: String,
    pub size_bytes: u64,
}

/// 연결 상태
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionStats {
    pub active: u32,
    pub idle: u32,
}
