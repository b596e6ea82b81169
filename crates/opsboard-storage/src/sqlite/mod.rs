//! SQLite 저장소 어댑터.
//!
//! `RelationalStore` 포트 구현.
//!
//! # 모듈 구조
//! - `schema`: 엔티티 → 테이블/컬럼 매핑
//! - `query`: 쿼리 모델 → SQL 변환, 행 디코딩
//! - `store`: count/findMany/groupBy/aggregate/native 쿼리 (RelationalStore 포트)

mod query;
mod schema;
mod store;

pub use query::format_ts;

use opsboard_core::error::CoreError;
use opsboard_core::models::query::{Entity, Value};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::migration;

/// SQLite 저장소: `RelationalStore` 포트 구현
pub struct SqliteStore {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Store(format!("SQLite 열기 실패: {e}")))?;

        // 성능 최적화 PRAGMA 설정
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA cache_size=8000;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| CoreError::Store(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Store(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트/데모용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Store(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Store(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }

    /// 레코드 한 건 삽입 (도메인 필드 이름 기준, 생략한 필드는 컬럼 기본값)
    pub fn insert(&self, entity: Entity, values: &[(&str, Value)]) -> Result<(), CoreError> {
        let table = schema::table(entity);
        let columns = values
            .iter()
            .map(|(name, _)| table.field(name).map(|f| f.column))
            .collect::<Result<Vec<_>, _>>()?;
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            table.name,
            columns.join(", ")
        );

        let conn = self.lock()?;
        conn.execute(
            &sql,
            params_from_iter(values.iter().map(|(_, v)| query::bind_value(v))),
        )
        .map_err(|e| CoreError::Store(format!("{} 삽입 실패: {e}", entity.name())))?;

        debug!("{} 레코드 삽입", entity.name());
        Ok(())
    }
}
