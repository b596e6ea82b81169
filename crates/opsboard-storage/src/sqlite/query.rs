//! 쿼리 모델 → SQL 변환과 행 디코딩.

use chrono::{DateTime, SecondsFormat, Utc};
use opsboard_core::error::CoreError;
use opsboard_core::models::query::{AggregateOp, Filter, SortOrder, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::json;

use super::schema::{Field, FieldKind, Table};

/// 타임스탬프 저장 형식 (사전순 = 시간순)
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 비교값 → SQLite 바인딩 값
pub(crate) fn bind_value(value: &Value) -> SqlValue {
    match value {
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Time(ts) => SqlValue::Text(format_ts(*ts)),
    }
}

/// where 절 렌더링: 바인딩 값은 `params`에 순서대로 추가
pub(crate) fn render_filter(
    table: &Table,
    alias: &str,
    filter: &Filter,
    params: &mut Vec<SqlValue>,
) -> Result<String, CoreError> {
    let compare = |field: &str, op: &str, value: &Value, params: &mut Vec<SqlValue>| {
        let column = table.field(field)?.column;
        params.push(bind_value(value));
        Ok::<_, CoreError>(format!("{alias}.{column} {op} ?{}", params.len()))
    };

    match filter {
        Filter::All => Ok("1 = 1".to_string()),
        Filter::Eq(f, v) => compare(*f, "=", v, params),
        Filter::Gt(f, v) => compare(*f, ">", v, params),
        Filter::Gte(f, v) => compare(*f, ">=", v, params),
        Filter::Lt(f, v) => compare(*f, "<", v, params),
        Filter::Lte(f, v) => compare(*f, "<=", v, params),
        // 대소문자 구분 부분 문자열 (LIKE는 ASCII 대소문자를 무시함)
        Filter::Contains(f, needle) => {
            let column = table.field(f)?.column;
            params.push(SqlValue::Text(needle.clone()));
            Ok(format!("instr({alias}.{column}, ?{}) > 0", params.len()))
        }
        Filter::And(parts) if parts.is_empty() => Ok("1 = 1".to_string()),
        Filter::And(parts) => {
            let rendered = parts
                .iter()
                .map(|p| render_filter(table, alias, p, params))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", rendered.join(" AND ")))
        }
    }
}

/// ORDER BY 절
pub(crate) fn render_order(
    table: &Table,
    alias: &str,
    order_by: Option<(&str, SortOrder)>,
) -> Result<String, CoreError> {
    match order_by {
        None => Ok(String::new()),
        Some((field, order)) => {
            let column = table.field(field)?.column;
            let dir = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            Ok(format!(" ORDER BY {alias}.{column} {dir}"))
        }
    }
}

/// 집계 함수 이름
pub(crate) fn aggregate_fn(op: AggregateOp) -> &'static str {
    match op {
        AggregateOp::Avg => "AVG",
        AggregateOp::Sum => "SUM",
        AggregateOp::Min => "MIN",
        AggregateOp::Max => "MAX",
    }
}

/// 컬럼 값 → JSON (필드 형식 기준)
pub(crate) fn decode(field: &Field, raw: ValueRef<'_>) -> serde_json::Value {
    match (field.kind, raw) {
        (_, ValueRef::Null) => serde_json::Value::Null,
        (FieldKind::Bool, ValueRef::Integer(i)) => json!(i != 0),
        (FieldKind::Real, ValueRef::Integer(i)) => json!(i as f64),
        (FieldKind::Json, ValueRef::Text(bytes)) => {
            let text = String::from_utf8_lossy(bytes);
            serde_json::from_str::<serde_json::Value>(&text).unwrap_or_else(|_| json!(text))
        }
        (_, other) => decode_raw(other),
    }
}

/// 컬럼 값 → JSON (형식 정보 없이)
pub(crate) fn decode_raw(raw: ValueRef<'_>) -> serde_json::Value {
    match raw {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(bytes) => json!(String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => json!(bytes.len()),
    }
}

/// 숫자 컬럼 값 → f64 (NULL이면 None)
pub(crate) fn decode_number(raw: ValueRef<'_>) -> Option<f64> {
    match raw {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::schema::table;
    use super::*;
    use chrono::TimeZone;
    use opsboard_core::models::query::Entity;

    #[test]
    fn renders_nested_filter_with_positional_params() {
        let t = table(Entity::Session);
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let filter = Filter::gte("createdAt", since).and(Filter::eq("appVersion", "1.2.0"));

        let mut params = Vec::new();
        let sql = render_filter(t, "t", &filter, &mut params).unwrap();

        assert_eq!(sql, "(t.created_at >= ?1 AND t.app_version = ?2)");
        assert_eq!(
            params[0],
            SqlValue::Text("2024-01-01T00:00:00.000Z".to_string())
        );
        assert_eq!(params[1], SqlValue::Text("1.2.0".to_string()));
    }

    #[test]
    fn contains_binds_needle_verbatim() {
        let t = table(Entity::UserEvent);
        let mut params = Vec::new();
        let sql = render_filter(t, "t", &Filter::contains("eventType", "ADMIN_%"), &mut params)
            .unwrap();

        assert_eq!(sql, "instr(t.event_type, ?1) > 0");
        assert_eq!(params[0], SqlValue::Text("ADMIN_%".to_string()));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let t = table(Entity::Post);
        let mut params = Vec::new();
        assert!(render_filter(t, "t", &Filter::eq("bogus", 1i64), &mut params).is_err());
        assert!(render_order(t, "t", Some(("bogus", SortOrder::Asc))).is_err());
    }

    #[test]
    fn decodes_by_field_kind() {
        let t = table(Entity::AdImpression);
        let clicked = t.field("clicked").unwrap();
        assert_eq!(decode(clicked, ValueRef::Integer(1)), json!(true));

        let revenue = t.field("revenue").unwrap();
        assert_eq!(decode(revenue, ValueRef::Integer(3)), json!(3.0));
        assert_eq!(decode(revenue, ValueRef::Null), serde_json::Value::Null);

        let events = table(Entity::UserEvent);
        let metadata = events.field("metadata").unwrap();
        assert_eq!(
            decode(metadata, ValueRef::Text(br#"{"screen":"feed"}"#)),
            json!({"screen": "feed"})
        );
        assert_eq!(
            decode(metadata, ValueRef::Text(b"not json")),
            json!("not json")
        );
    }
}
