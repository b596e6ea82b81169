//! 관계형 저장소 프로브.

use opsboard_core::error::{describe_error, CoreError};
use opsboard_core::models::query::{Entity, Filter, NativeQuery};
use opsboard_core::models::store::{DbPerformance, TableSize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::support::try_or_default;
use crate::MonitoringService;

/// 바이트 → 사람이 읽는 크기 ("8192 bytes", "16 kB", "3 MB")
///
/// 10 단위 이상일 때만 다음 단위로 올리고 반올림한다.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "kB", "MB", "GB", "TB"];
    const LIMIT: u64 = 10 * 1024;

    let mut value = bytes;
    let mut unit = 0;
    while value >= LIMIT && unit < UNITS.len() - 1 {
        value = (value + 512) / 1024;
        unit += 1;
    }
    format!("{value} {}", UNITS[unit])
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl MonitoringService {
    /// 저장소 지연 시간과 테이블 크기
    pub async fn get_db_performance(&self) -> DbPerformance {
        let start = Instant::now();

        if let Err(e) = self.store.count(Entity::User, &Filter::All).await {
            let query_time = elapsed_ms(start);
            let desc = describe_error(&e);
            warn!(code = desc.code.as_deref().unwrap_or("-"), "DB 프로브 실패 ({query_time}ms): {}", desc.message);
            return DbPerformance::Failed {
                query_time,
                error: desc.message,
            };
        }
        let query_time = elapsed_ms(start);

        let table_sizes = try_or_default("largest_tables", self.largest_tables(), Vec::new()).await;

        debug!("DB 프로브: {query_time}ms, 테이블 {}개", table_sizes.len());
        DbPerformance::Measured {
            query_time,
            table_sizes,
            connections: self.store.connection_stats(),
        }
    }

    async fn largest_tables(&self) -> Result<Vec<TableSize>, CoreError> {
        let rows = self
            .store
            .native_query(NativeQuery::LargestTables {
                limit: self.config.largest_tables_limit,
            })
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let tablename = row.get("tablename")?.as_str()?.to_string();
                let size_bytes = row
                    .get("size_bytes")
                    .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
                    .unwrap_or(0);
                Some(TableSize {
                    tablename,
                    size: format_size(size_bytes),
                    size_bytes,
                })
            })
            .collect())
    }
}
