//! `RelationalStore` 포트 구현.

use async_trait::async_trait;
use opsboard_core::error::CoreError;
use opsboard_core::models::query::{
    AggregateSpec, Entity, Filter, FindQuery, GroupByQuery, GroupRow, Include, NativeQuery, Row,
};
use opsboard_core::models::store::ConnectionStats;
use opsboard_core::ports::store::RelationalStore;
use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::json;
use std::sync::TryLockError;
use tracing::debug;

use super::query::{aggregate_fn, decode, decode_number, decode_raw, render_filter, render_order};
use super::schema::{count_relation, relation, table, Field, Table};
use super::SqliteStore;

fn store_err(context: &str) -> impl Fn(rusqlite::Error) -> CoreError + '_ {
    move |e| CoreError::Store(format!("{context}: {e}"))
}

/// findMany의 include 실행 계획
enum IncludePlan {
    /// 외래 키 컬럼 위치 + 대상 테이블/필드
    Relation {
        name: &'static str,
        target: &'static Table,
        fields: Vec<&'static Field>,
        column: usize,
    },
    /// 서브쿼리 COUNT 컬럼 위치
    Count { name: &'static str, column: usize },
}

/// 외래 키 값 문자열화
fn key_text(raw: ValueRef<'_>) -> Option<String> {
    match raw {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

/// 연관 레코드 한 건 조회 (선택 필드만)
fn load_relation(
    conn: &Connection,
    target: &Table,
    fields: &[&Field],
    id: &str,
) -> Result<Option<Row>, CoreError> {
    let columns = fields
        .iter()
        .map(|f| f.column)
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {columns} FROM {} WHERE id = ?1", target.name);

    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(store_err("연관 조회 준비 실패"))?;
    let mut rows = stmt
        .query(params![id])
        .map_err(store_err("연관 조회 실패"))?;

    match rows.next().map_err(store_err("연관 행 읽기 실패"))? {
        Some(row) => {
            let mut out = Row::new();
            for (i, field) in fields.iter().enumerate() {
                let raw = row.get_ref(i).map_err(store_err("연관 컬럼 읽기 실패"))?;
                out.insert(field.name.to_string(), decode(field, raw));
            }
            Ok(Some(out))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl RelationalStore for SqliteStore {
    async fn count(&self, entity: Entity, filter: &Filter) -> Result<u64, CoreError> {
        let t = table(entity);
        let mut params = Vec::new();
        let where_sql = render_filter(t, "t", filter, &mut params)?;
        let sql = format!("SELECT COUNT(*) FROM {} t WHERE {where_sql}", t.name);

        let conn = self.lock()?;
        let n: i64 = conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(store_err("COUNT 실패"))?;

        debug!("{} COUNT = {n}", entity.name());
        Ok(n.max(0) as u64)
    }

    async fn find_many(&self, query: &FindQuery) -> Result<Vec<Row>, CoreError> {
        let t = table(query.entity);

        let fields: Vec<&'static Field> = if query.select.is_empty() {
            t.fields.iter().collect()
        } else {
            query
                .select
                .iter()
                .map(|name| t.field(name))
                .collect::<Result<_, _>>()?
        };

        let mut columns: Vec<String> = fields.iter().map(|f| format!("t.{}", f.column)).collect();
        let mut plans = Vec::with_capacity(query.include.len());
        for include in &query.include {
            match include {
                Include::Relation { name, fields } => {
                    let rel = relation(query.entity, name)?;
                    let target = table(rel.target);
                    let target_fields = fields
                        .iter()
                        .map(|f| target.field(f))
                        .collect::<Result<Vec<_>, _>>()?;
                    columns.push(format!("t.{}", rel.foreign_key));
                    plans.push(IncludePlan::Relation {
                        name: *name,
                        target,
                        fields: target_fields,
                        column: columns.len() - 1,
                    });
                }
                Include::Count(name) => {
                    let cr = count_relation(query.entity, name)?;
                    let condition = cr
                        .condition
                        .map(|c| format!(" AND c.{c}"))
                        .unwrap_or_default();
                    columns.push(format!(
                        "(SELECT COUNT(*) FROM {} c WHERE c.{} = t.id{condition})",
                        cr.table, cr.foreign_key
                    ));
                    plans.push(IncludePlan::Count {
                        name: *name,
                        column: columns.len() - 1,
                    });
                }
            }
        }

        let mut params = Vec::new();
        let where_sql = render_filter(t, "t", &query.filter, &mut params)?;
        let order_sql = render_order(t, "t", query.order_by)?;
        let limit_sql = query
            .take
            .map(|n| format!(" LIMIT {n}"))
            .unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM {} t WHERE {where_sql}{order_sql}{limit_sql}",
            columns.join(", "),
            t.name
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(store_err("findMany 준비 실패"))?;

        // (행, 관계별 외래 키)
        let fetched = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut out = Row::new();
                for (i, field) in fields.iter().enumerate() {
                    out.insert(field.name.to_string(), decode(field, row.get_ref(i)?));
                }

                let mut counts = serde_json::Map::new();
                let mut keys = Vec::new();
                for plan in &plans {
                    match plan {
                        IncludePlan::Relation { column, .. } => {
                            keys.push(key_text(row.get_ref(*column)?));
                        }
                        IncludePlan::Count { name, column } => {
                            let n: i64 = row.get(*column)?;
                            counts.insert(name.to_string(), json!(n));
                        }
                    }
                }
                if !counts.is_empty() {
                    out.insert("_count".to_string(), serde_json::Value::Object(counts));
                }
                Ok((out, keys))
            })
            .map_err(store_err("findMany 실패"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err("findMany 행 읽기 실패"))?;

        let mut result = Vec::with_capacity(fetched.len());
        for (mut row, keys) in fetched {
            let relations = plans.iter().filter_map(|p| match p {
                IncludePlan::Relation {
                    name,
                    target,
                    fields,
                    ..
                } => Some((*name, *target, fields)),
                IncludePlan::Count { .. } => None,
            });
            for ((name, target, fields), key) in relations.zip(keys) {
                let related = match key {
                    Some(id) => load_relation(&conn, target, fields, &id)?,
                    None => None,
                };
                let value = related
                    .map(serde_json::Value::Object)
                    .unwrap_or(serde_json::Value::Null);
                row.insert(name.to_string(), value);
            }
            result.push(row);
        }

        debug!("{} findMany: {}건", query.entity.name(), result.len());
        Ok(result)
    }

    async fn group_by(&self, query: &GroupByQuery) -> Result<Vec<GroupRow>, CoreError> {
        let t = table(query.entity);
        let by = t.field(query.by)?;

        let mut aggregates = String::new();
        for spec in &query.aggregates {
            let column = t.field(spec.field)?.column;
            aggregates.push_str(&format!(", {}(t.{column})", aggregate_fn(spec.op)));
        }

        let mut params = Vec::new();
        let where_sql = render_filter(t, "t", &query.filter, &mut params)?;
        let order_sql = if query.order_by_count_desc {
            " ORDER BY cnt DESC"
        } else {
            ""
        };
        let limit_sql = query
            .take
            .map(|n| format!(" LIMIT {n}"))
            .unwrap_or_default();
        let sql = format!(
            "SELECT t.{col}, COUNT(*) AS cnt{aggregates} FROM {name} t WHERE {where_sql} \
             GROUP BY t.{col}{order_sql}{limit_sql}",
            col = by.column,
            name = t.name,
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(store_err("groupBy 준비 실패"))?;
        let agg_count = query.aggregates.len();
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let key = decode(by, row.get_ref(0)?);
                let count: i64 = row.get(1)?;
                let mut values = Vec::with_capacity(agg_count);
                for i in 0..agg_count {
                    values.push(decode_number(row.get_ref(2 + i)?));
                }
                Ok(GroupRow {
                    key,
                    count: count.max(0) as u64,
                    values,
                })
            })
            .map_err(store_err("groupBy 실패"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err("groupBy 행 읽기 실패"))?;

        debug!(
            "{} groupBy {}: {}개 그룹",
            query.entity.name(),
            query.by,
            rows.len()
        );
        Ok(rows)
    }

    async fn aggregate(
        &self,
        entity: Entity,
        spec: AggregateSpec,
        filter: &Filter,
    ) -> Result<Option<f64>, CoreError> {
        let t = table(entity);
        let column = t.field(spec.field)?.column;
        let mut params = Vec::new();
        let where_sql = render_filter(t, "t", filter, &mut params)?;
        let sql = format!(
            "SELECT {}(t.{column}) FROM {} t WHERE {where_sql}",
            aggregate_fn(spec.op),
            t.name
        );

        let conn = self.lock()?;
        conn.query_row(&sql, params_from_iter(params.iter()), |row| {
            Ok(decode_number(row.get_ref(0)?))
        })
        .map_err(store_err("집계 실패"))
    }

    async fn native_query(&self, query: NativeQuery) -> Result<Vec<Row>, CoreError> {
        let conn = self.lock()?;
        match query {
            NativeQuery::InteractionSummary => {
                let row = conn
                    .query_row(
                        "SELECT COUNT(DISTINCT post_id),
                                COALESCE(SUM(CASE WHEN type = 'LIKE' THEN 1 ELSE 0 END), 0),
                                COALESCE(SUM(CASE WHEN type = 'COMMENT' THEN 1 ELSE 0 END), 0)
                         FROM post_interactions",
                        [],
                        |row| {
                            let mut out = Row::new();
                            out.insert(
                                "posts_with_interactions".to_string(),
                                json!(row.get::<_, i64>(0)?),
                            );
                            out.insert("total_likes".to_string(), json!(row.get::<_, i64>(1)?));
                            out.insert(
                                "total_comments".to_string(),
                                json!(row.get::<_, i64>(2)?),
                            );
                            Ok(out)
                        },
                    )
                    .map_err(store_err("상호작용 요약 실패"))?;
                Ok(vec![row])
            }
            NativeQuery::LargestTables { limit } => {
                // dbstat 가상 테이블: 페이지 단위 크기 합계
                let mut stmt = conn
                    .prepare(
                        "SELECT name, SUM(pgsize) AS size_bytes FROM dbstat
                         WHERE name IN (
                             SELECT name FROM sqlite_master
                             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                         )
                         GROUP BY name
                         ORDER BY size_bytes DESC
                         LIMIT ?1",
                    )
                    .map_err(store_err("테이블 크기 조회 준비 실패"))?;
                let rows = stmt
                    .query_map(params![limit as i64], |row| {
                        let mut out = Row::new();
                        out.insert("tablename".to_string(), decode_raw(row.get_ref(0)?));
                        out.insert("size_bytes".to_string(), decode_raw(row.get_ref(1)?));
                        Ok(out)
                    })
                    .map_err(store_err("테이블 크기 조회 실패"))?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(store_err("테이블 크기 행 읽기 실패"))?;
                Ok(rows)
            }
        }
    }

    fn connection_stats(&self) -> ConnectionStats {
        // 단일 연결: 잠겨 있으면 사용 중
        match self.conn.try_lock() {
            Ok(_) => ConnectionStats { active: 0, idle: 1 },
            Err(TryLockError::WouldBlock) => ConnectionStats { active: 1, idle: 0 },
            Err(TryLockError::Poisoned(_)) => ConnectionStats::default(),
        }
    }
}
