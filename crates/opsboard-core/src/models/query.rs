//! 관계형 저장소 쿼리 모델.
//!
//! 모니터링 서비스는 특정 DB 엔진에 묶이지 않고 이 모델로 count/findMany/groupBy/aggregate를
//! 표현한다. 필드 이름은 도메인 이름(camelCase)이며 어댑터가 실제 컬럼으로 매핑한다.

use chrono::{DateTime, Utc};
use serde_json::Map;

/// 조회 결과 행 (필드 이름 → JSON 값)
pub type Row = Map<String, serde_json::Value>;

/// 조회 대상 엔티티
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    Session,
    UserEvent,
    Post,
    PostInteraction,
    JobPost,
    UserScore,
    McqQuestion,
    McqAttempt,
    Referral,
    Notification,
    AdImpression,
}

impl Entity {
    /// 엔티티 이름
    pub fn name(self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Session => "Session",
            Entity::UserEvent => "UserEvent",
            Entity::Post => "Post",
            Entity::PostInteraction => "PostInteraction",
            Entity::JobPost => "JobPost",
            Entity::UserScore => "UserScore",
            Entity::McqQuestion => "McqQuestion",
            Entity::McqAttempt => "McqAttempt",
            Entity::Referral => "Referral",
            Entity::Notification => "Notification",
            Entity::AdImpression => "AdImpression",
        }
    }
}

/// 필터 비교값
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Time(DateTime<Utc>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

/// where 절
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// 조건 없음
    #[default]
    All,
    Eq(&'static str, Value),
    Gt(&'static str, Value),
    Gte(&'static str, Value),
    Lt(&'static str, Value),
    Lte(&'static str, Value),
    /// 부분 문자열 포함 (대소문자 구분)
    Contains(&'static str, String),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn gt(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Gt(field, value.into())
    }

    pub fn gte(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Gte(field, value.into())
    }

    pub fn lte(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Lte(field, value.into())
    }

    pub fn contains(field: &'static str, needle: impl Into<String>) -> Self {
        Filter::Contains(field, needle.into())
    }

    /// `start <= field < end`
    pub fn between(field: &'static str, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Filter::And(vec![
            Filter::Gte(field, start.into()),
            Filter::Lt(field, end.into()),
        ])
    }

    /// 두 필터의 논리곱
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// 연관 데이터 포함 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Include {
    /// 연관 엔티티의 일부 필드를 중첩 객체로 포함 (예: `user { id, email }`)
    Relation {
        name: &'static str,
        fields: Vec<&'static str>,
    },
    /// 연관 레코드 수를 `_count.{name}`으로 포함
    Count(&'static str),
}

/// findMany 쿼리
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub entity: Entity,
    pub filter: Filter,
    pub order_by: Option<(&'static str, SortOrder)>,
    pub take: Option<usize>,
    /// 비어 있으면 전체 필드
    pub select: Vec<&'static str>,
    pub include: Vec<Include>,
}

impl FindQuery {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            filter: Filter::All,
            order_by: None,
            take: None,
            select: Vec::new(),
            include: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, field: &'static str, order: SortOrder) -> Self {
        self.order_by = Some((field, order));
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn select(mut self, fields: &[&'static str]) -> Self {
        self.select = fields.to_vec();
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }
}

/// 집계 연산
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Avg,
    Sum,
    Min,
    Max,
}

/// 집계 대상 (연산 + 필드)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSpec {
    pub op: AggregateOp,
    pub field: &'static str,
}

impl AggregateSpec {
    pub fn avg(field: &'static str) -> Self {
        Self {
            op: AggregateOp::Avg,
            field,
        }
    }

    pub fn sum(field: &'static str) -> Self {
        Self {
            op: AggregateOp::Sum,
            field,
        }
    }
}

/// groupBy 쿼리
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByQuery {
    pub entity: Entity,
    pub by: &'static str,
    pub filter: Filter,
    /// 각 그룹에서 계산할 집계 (결과의 `values`와 순서가 같다)
    pub aggregates: Vec<AggregateSpec>,
    /// true면 그룹 크기 내림차순 정렬
    pub order_by_count_desc: bool,
    pub take: Option<usize>,
}

impl GroupByQuery {
    pub fn new(entity: Entity, by: &'static str) -> Self {
        Self {
            entity,
            by,
            filter: Filter::All,
            aggregates: Vec::new(),
            order_by_count_desc: false,
            take: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    /// 그룹 크기 내림차순 정렬
    pub fn order_by_count(mut self) -> Self {
        self.order_by_count_desc = true;
        self
    }

    pub fn top_by_count(mut self, take: usize) -> Self {
        self.order_by_count_desc = true;
        self.take = Some(take);
        self
    }
}

/// groupBy 결과 행
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    /// 그룹 키 (NULL이면 `Value::Null`)
    pub key: serde_json::Value,
    pub count: u64,
    /// `GroupByQuery::aggregates` 순서의 집계값 (NULL이면 None)
    pub values: Vec<Option<f64>>,
}

/// 엔진 전용 introspection 쿼리
///
/// 어댑터가 자신의 SQL 방언으로 렌더링한다. 실패해도 되는 best-effort 용도로만 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeQuery {
    /// 상호작용 요약: `posts_with_interactions`, `total_likes`, `total_comments`
    InteractionSummary,
    /// 크기 순 상위 테이블: `tablename`, `size_bytes`
    LargestTables { limit: usize },
}
