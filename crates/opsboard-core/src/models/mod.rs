//! OPSBOARD 도메인 모델.
//!
//! 대시보드로 반환되는 읽기 모델과 관계형 저장소 쿼리 모델을 정의한다.
//! 응답 모델은 `serde` camelCase로 직렬화된다 (관리자 웹과 공유하는 형태).

pub mod analytics;
pub mod cache;
pub mod host;
pub mod query;
pub mod queue;
pub mod store;

/// 분모가 0이면 0을 돌려주는 백분율 계산
///
/// NaN/Infinity가 응답에 섞이지 않도록 모든 비율 계산은 이 함수를 거친다.
pub fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 && part.is_finite() && total.is_finite() {
        (part / total) * 100.0
    } else {
        0.0
    }
}
