//! 엔티티 → 테이블/컬럼 매핑.

use opsboard_core::error::CoreError;
use opsboard_core::models::query::Entity;

/// 컬럼 저장 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Real,
    /// 0/1 정수
    Bool,
    /// RFC3339 밀리초 UTC 텍스트
    Time,
    /// JSON 텍스트
    Json,
}

/// 도메인 필드
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> Field {
    Field { name, column, kind }
}

/// 테이블 정의
#[derive(Debug)]
pub(crate) struct Table {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Table {
    /// 도메인 필드 이름으로 컬럼 조회
    pub fn field(&self, name: &str) -> Result<&Field, CoreError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::Validation {
                field: name.to_string(),
                message: format!("{} 테이블에 없는 필드", self.name),
            })
    }
}

/// 단건 연관 (외래 키 → 대상 테이블의 id)
#[derive(Debug, Clone, Copy)]
pub(crate) struct Relation {
    pub target: Entity,
    pub foreign_key: &'static str,
}

/// 연관 레코드 수 (`_count`)
#[derive(Debug, Clone, Copy)]
pub(crate) struct CountRelation {
    pub table: &'static str,
    pub foreign_key: &'static str,
    /// 추가 조건 (상수 SQL)
    pub condition: Option<&'static str>,
}

use FieldKind::*;

static USERS: Table = Table {
    name: "users",
    fields: &[
        field("id", "id", Text),
        field("email", "email", Text),
        field("isActive", "is_active", Bool),
        field("createdAt", "created_at", Time),
        field("updatedAt", "updated_at", Time),
    ],
};

static SESSIONS: Table = Table {
    name: "sessions",
    fields: &[
        field("id", "id", Text),
        field("userId", "user_id", Text),
        field("appVersion", "app_version", Text),
        field("createdAt", "created_at", Time),
        field("expiresAt", "expires_at", Time),
    ],
};

static USER_EVENTS: Table = Table {
    name: "user_events",
    fields: &[
        field("id", "id", Text),
        field("userId", "user_id", Text),
        field("eventType", "event_type", Text),
        field("metadata", "metadata", Json),
        field("createdAt", "created_at", Time),
    ],
};

static POSTS: Table = Table {
    name: "posts",
    fields: &[
        field("id", "id", Text),
        field("title", "title", Text),
        field("isActive", "is_active", Bool),
        field("createdAt", "created_at", Time),
        field("updatedAt", "updated_at", Time),
    ],
};

static POST_INTERACTIONS: Table = Table {
    name: "post_interactions",
    fields: &[
        field("id", "id", Text),
        field("postId", "post_id", Text),
        field("userId", "user_id", Text),
        field("type", "type", Text),
        field("createdAt", "created_at", Time),
    ],
};

static JOB_POSTS: Table = Table {
    name: "job_posts",
    fields: &[
        field("id", "id", Text),
        field("title", "title", Text),
        field("createdAt", "created_at", Time),
    ],
};

static USER_SCORES: Table = Table {
    name: "user_scores",
    fields: &[
        field("id", "id", Text),
        field("userId", "user_id", Text),
        field("totalScore", "total_score", Real),
        field("updatedAt", "updated_at", Time),
    ],
};

static MCQ_QUESTIONS: Table = Table {
    name: "mcq_questions",
    fields: &[
        field("id", "id", Text),
        field("categoryId", "category_id", Text),
        field("createdAt", "created_at", Time),
    ],
};

static MCQ_ATTEMPTS: Table = Table {
    name: "mcq_attempts",
    fields: &[
        field("id", "id", Text),
        field("userId", "user_id", Text),
        field("categoryId", "category_id", Text),
        field("score", "score", Real),
        field("createdAt", "created_at", Time),
    ],
};

static REFERRALS: Table = Table {
    name: "referrals",
    fields: &[
        field("id", "id", Text),
        field("referrerId", "referrer_id", Text),
        field("referredId", "referred_id", Text),
        field("rewardAmount", "reward_amount", Real),
        field("createdAt", "created_at", Time),
    ],
};

static NOTIFICATIONS: Table = Table {
    name: "notifications",
    fields: &[
        field("id", "id", Text),
        field("userId", "user_id", Text),
        field("isRead", "is_read", Bool),
        field("createdAt", "created_at", Time),
    ],
};

static AD_IMPRESSIONS: Table = Table {
    name: "ad_impressions",
    fields: &[
        field("id", "id", Text),
        field("campaignId", "campaign_id", Text),
        field("clicked", "clicked", Bool),
        field("revenue", "revenue", Real),
        field("createdAt", "created_at", Time),
    ],
};

/// 엔티티의 테이블 정의
pub(crate) fn table(entity: Entity) -> &'static Table {
    match entity {
        Entity::User => &USERS,
        Entity::Session => &SESSIONS,
        Entity::UserEvent => &USER_EVENTS,
        Entity::Post => &POSTS,
        Entity::PostInteraction => &POST_INTERACTIONS,
        Entity::JobPost => &JOB_POSTS,
        Entity::UserScore => &USER_SCORES,
        Entity::McqQuestion => &MCQ_QUESTIONS,
        Entity::McqAttempt => &MCQ_ATTEMPTS,
        Entity::Referral => &REFERRALS,
        Entity::Notification => &NOTIFICATIONS,
        Entity::AdImpression => &AD_IMPRESSIONS,
    }
}

/// 단건 연관 조회
pub(crate) fn relation(entity: Entity, name: &str) -> Result<Relation, CoreError> {
    let found = match (entity, name) {
        (Entity::UserEvent, "user")
        | (Entity::Session, "user")
        | (Entity::Notification, "user")
        | (Entity::McqAttempt, "user")
        | (Entity::UserScore, "user") => Some(Relation {
            target: Entity::User,
            foreign_key: "user_id",
        }),
        (Entity::PostInteraction, "post") => Some(Relation {
            target: Entity::Post,
            foreign_key: "post_id",
        }),
        _ => None,
    };
    found.ok_or_else(|| unknown_relation(entity, name))
}

/// 연관 레코드 수 조회
pub(crate) fn count_relation(entity: Entity, name: &str) -> Result<CountRelation, CoreError> {
    let found = match (entity, name) {
        (Entity::Post, "likes") => Some(CountRelation {
            table: "post_interactions",
            foreign_key: "post_id",
            condition: Some("type = 'LIKE'"),
        }),
        (Entity::Post, "comments") => Some(CountRelation {
            table: "post_interactions",
            foreign_key: "post_id",
            condition: Some("type = 'COMMENT'"),
        }),
        (Entity::Post, "interactions") => Some(CountRelation {
            table: "post_interactions",
            foreign_key: "post_id",
            condition: None,
        }),
        (Entity::User, "sessions") => Some(CountRelation {
            table: "sessions",
            foreign_key: "user_id",
            condition: None,
        }),
        _ => None,
    };
    found.ok_or_else(|| unknown_relation(entity, name))
}

fn unknown_relation(entity: Entity, name: &str) -> CoreError {
    CoreError::Validation {
        field: name.to_string(),
        message: format!("{}에 정의되지 않은 연관", entity.name()),
    }
}
