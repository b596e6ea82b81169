//! 분석 롤업.
//!
//! 각 롤업은 관계형 저장소에 대한 독립 쿼리 여러 개를 동시에 실행해 하나의 객체로 합친다.
//! 필수 count/조회 실패는 롤업 전체 실패로 전파하고, 보조 쿼리는 `try_or_default`로 감싼다.

pub mod app;
pub mod behavior;
pub mod engagement;
pub mod web;

use opsboard_core::models::query::Row;

/// 행의 문자열 필드 (없거나 NULL이면 빈 문자열)
pub(crate) fn row_str(row: &Row, field: &str) -> String {
    row.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// 그룹 키 표시 문자열 (NULL이면 `fallback`)
pub(crate) fn key_label(key: &serde_json::Value, fallback: &str) -> String {
    match key {
        serde_json::Value::Null => fallback.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
