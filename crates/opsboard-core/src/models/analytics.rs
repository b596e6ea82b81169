//! 파생 분석 롤업 모델.
//!
//! 앱/웹/사용자 행동/참여도 대시보드가 한 번의 요청으로 받는 합성 객체들.
//! 숫자 필드는 데이터가 없으면 0, 목록 필드는 빈 배열이다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================
// API 지연 시간
// ============================================================

/// API 지연 시간 요약 (밀리초)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiLatency {
    pub average: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub requests: u64,
}

// ============================================================
// 앱 메트릭
// ============================================================

/// 앱 크래시/기능 사용량 롤업
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppMetrics {
    /// 최근 크래시 개수 (조회된 목록 길이)
    pub crashes: usize,
    pub recent_crashes: Vec<CrashReport>,
    /// 만료되지 않은 세션 수
    pub active_users: u64,
    /// 활성 계정 수
    pub total_users: u64,
    pub feature_usage: Vec<FeatureUsage>,
    pub version_distribution: Vec<VersionShare>,
}

/// 에러 이벤트
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrashReport {
    pub id: String,
    pub user_id: Option<String>,
    pub event_type: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: String,
}

/// 기능(이벤트 유형)별 사용 횟수
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureUsage {
    pub feature: String,
    pub count: u64,
}

/// 앱 버전 분포
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionShare {
    pub version: String,
    pub users: u64,
    pub percent: f64,
}

// ============================================================
// 웹 메트릭
// ============================================================

/// 웹/CMS 활동 롤업
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebMetrics {
    pub cms_activity: CmsActivity,
    pub admin_logs: Vec<AdminLogEntry>,
    pub traffic_summary: TrafficSummary,
}

/// 최근 24시간 CMS 활동
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CmsActivity {
    pub posts_created: u64,
    pub posts_updated: u64,
    pub users_created: u64,
    pub jobs_created: u64,
    /// 집계 구간 시작 시각
    pub last_24h: DateTime<Utc>,
}

/// 관리자 감사 로그 항목
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogEntry {
    pub id: String,
    pub user_id: Option<String>,
    pub event_type: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: String,
    /// 행위자 정보 (계정이 삭제되었으면 None)
    #[serde(default)]
    pub user: Option<ActorIdentity>,
}

/// 행위자 식별 정보
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorIdentity {
    pub id: String,
    pub email: Option<String>,
}

/// 일별 트래픽 요약
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    /// 오래된 날짜부터 오늘까지
    pub last_7_days: Vec<DailyTraffic>,
    pub total: TrafficTotals,
}

/// 하루치 트래픽
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyTraffic {
    /// YYYY-MM-DD (UTC)
    pub date: String,
    pub sessions: u64,
    pub users: u64,
}

/// 트래픽 합계
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TrafficTotals {
    pub sessions: u64,
    pub users: u64,
}

// ============================================================
// 사용자 행동 메트릭
// ============================================================

/// 사용자 행동 롤업
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserBehaviorMetrics {
    pub feed_stats: FeedStats,
    pub scorecard_tracking: ScorecardTracking,
    pub content_performance: ContentPerformance,
    pub mcq_analytics: McqAnalytics,
    pub referral_analytics: ReferralAnalytics,
}

/// 피드 통계
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub total_feeds: u64,
    pub active_feeds: u64,
    pub interactions: InteractionSummary,
}

/// 게시물 상호작용 요약
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionSummary {
    pub posts_with_interactions: u64,
    pub total_likes: u64,
    pub total_comments: u64,
}

/// 점수 추적
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardTracking {
    pub total_users: u64,
    pub users_with_score: u64,
    pub avg_score: f64,
    pub distribution: ScoreDistribution,
}

/// 점수 구간별 사용자 수
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ScoreDistribution {
    #[serde(rename = "0-100")]
    pub up_to_100: u64,
    #[serde(rename = "101-500")]
    pub up_to_500: u64,
    #[serde(rename = "501-1000")]
    pub up_to_1000: u64,
    #[serde(rename = "1000+")]
    pub above_1000: u64,
}

/// 콘텐츠 성과
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentPerformance {
    pub top_posts: Vec<TopPost>,
}

/// 최근 게시물과 반응 수
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopPost {
    pub id: String,
    pub title: String,
    pub likes: u64,
    pub comments: u64,
    pub created_at: String,
}

/// 퀴즈(MCQ) 분석
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct McqAnalytics {
    pub total_questions: u64,
    pub total_attempts: u64,
    pub avg_score: f64,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

/// 카테고리별 응시 수/평균 점수
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: serde_json::Value,
    pub attempts: u64,
    pub avg_score: f64,
}

/// 추천(레퍼럴) 분석
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferralAnalytics {
    pub total_referrals: u64,
    pub active_referrers: u64,
    pub total_rewards: f64,
}

// ============================================================
// 참여도 메트릭
// ============================================================

/// 참여도 롤업
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub notifications: NotificationMetrics,
    pub ads_performance: AdsPerformance,
    pub streak_insights: StreakInsights,
}

/// 알림 메트릭
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetrics {
    pub total: u64,
    pub sent_24h: u64,
    pub read: u64,
    pub unread: u64,
    pub read_rate: f64,
}

/// 광고 성과
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AdsPerformance {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub revenue: f64,
}

/// 연속 활동 인사이트
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreakInsights {
    pub active_streaks: u64,
    pub avg_streak_length: f64,
    pub longest_streak: u64,
}
