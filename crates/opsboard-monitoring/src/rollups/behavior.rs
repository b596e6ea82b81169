//! 사용자 행동 메트릭: 피드, 점수, 콘텐츠 성과, 퀴즈, 추천.

use opsboard_core::error::CoreError;
use opsboard_core::models::analytics::{
    CategoryBreakdown, ContentPerformance, FeedStats, InteractionSummary, McqAnalytics,
    ReferralAnalytics, ScoreDistribution, ScorecardTracking, TopPost, UserBehaviorMetrics,
};
use opsboard_core::models::query::{
    AggregateSpec, Entity, Filter, FindQuery, GroupByQuery, Include, NativeQuery, Row, SortOrder,
};
use tracing::debug;

use super::row_str;
use crate::error::MonitoringError;
use crate::support::try_or_default;
use crate::MonitoringService;

const TOP_POST_FIELDS: [&str; 3] = ["id", "title", "createdAt"];

fn count_of(row: &Row, name: &str) -> u64 {
    row.get("_count")
        .and_then(|c| c.get(name))
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
}

impl MonitoringService {
    /// 사용자 행동 롤업
    pub async fn get_user_behavior_metrics(&self) -> Result<UserBehaviorMetrics, MonitoringError> {
        let (feed_stats, scorecard_tracking, content_performance, mcq_analytics, referral_analytics) = tokio::try_join!(
            self.feed_stats(),
            self.scorecard_tracking(),
            self.content_performance(),
            self.mcq_analytics(),
            self.referral_analytics(),
        )?;

        debug!(
            "사용자 행동: 피드 {}, 점수 보유 {}, 응시 {}",
            feed_stats.total_feeds, scorecard_tracking.users_with_score, mcq_analytics.total_attempts
        );

        Ok(UserBehaviorMetrics {
            feed_stats,
            scorecard_tracking,
            content_performance,
            mcq_analytics,
            referral_analytics,
        })
    }

    async fn feed_stats(&self) -> Result<FeedStats, CoreError> {
        let active = Filter::eq("isActive", true);
        let (total_feeds, active_feeds, interactions) = tokio::try_join!(
            self.store.count(Entity::Post, &Filter::All),
            self.store.count(Entity::Post, &active),
            async {
                Ok::<_, CoreError>(try_or_default(
                    "interaction_summary",
                    self.interaction_summary(),
                    InteractionSummary::default(),
                )
                .await)
            },
        )?;

        Ok(FeedStats {
            total_feeds,
            active_feeds,
            interactions,
        })
    }

    async fn interaction_summary(&self) -> Result<InteractionSummary, CoreError> {
        let rows = self.store.native_query(NativeQuery::InteractionSummary).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(serde_json::from_value(serde_json::Value::Object(row))?),
            None => Ok(InteractionSummary::default()),
        }
    }

    async fn scorecard_tracking(&self) -> Result<ScorecardTracking, CoreError> {
        let (total_users, users_with_score, avg_score, distribution) = tokio::try_join!(
            self.store.count(Entity::User, &Filter::All),
            self.store.count(Entity::UserScore, &Filter::All),
            self.store
                .aggregate(Entity::UserScore, AggregateSpec::avg("totalScore"), &Filter::All),
            async {
                Ok::<_, CoreError>(try_or_default(
                    "score_distribution",
                    self.score_distribution(),
                    ScoreDistribution::default(),
                )
                .await)
            },
        )?;

        Ok(ScorecardTracking {
            total_users,
            users_with_score,
            avg_score: avg_score.unwrap_or(0.0),
            distribution,
        })
    }

    /// 점수 구간별 사용자 수 (0-100, 101-500, 501-1000, 1000+)
    pub async fn score_distribution(&self) -> Result<ScoreDistribution, CoreError> {
        let band = |low: Option<f64>, high: Option<f64>| {
            let mut filter = Filter::All;
            if let Some(low) = low {
                filter = filter.and(Filter::gt("totalScore", low));
            }
            if let Some(high) = high {
                filter = filter.and(Filter::lte("totalScore", high));
            }
            filter
        };
        let (b100, b500, b1000, above) = (
            band(None, Some(100.0)),
            band(Some(100.0), Some(500.0)),
            band(Some(500.0), Some(1000.0)),
            band(Some(1000.0), None),
        );

        let (up_to_100, up_to_500, up_to_1000, above_1000) = tokio::try_join!(
            self.store.count(Entity::UserScore, &b100),
            self.store.count(Entity::UserScore, &b500),
            self.store.count(Entity::UserScore, &b1000),
            self.store.count(Entity::UserScore, &above),
        )?;

        Ok(ScoreDistribution {
            up_to_100,
            up_to_500,
            up_to_1000,
            above_1000,
        })
    }

    async fn content_performance(&self) -> Result<ContentPerformance, CoreError> {
        let rows = self
            .store
            .find_many(
                &FindQuery::new(Entity::Post)
                    .order_by("createdAt", SortOrder::Desc)
                    .take(self.config.top_posts_limit)
                    .select(&TOP_POST_FIELDS)
                    .include(Include::Count("likes"))
                    .include(Include::Count("comments")),
            )
            .await?;

        let top_posts = rows
            .iter()
            .map(|row| TopPost {
                id: row_str(row, "id"),
                title: row_str(row, "title"),
                likes: count_of(row, "likes"),
                comments: count_of(row, "comments"),
                created_at: row_str(row, "createdAt"),
            })
            .collect();

        Ok(ContentPerformance { top_posts })
    }

    async fn mcq_analytics(&self) -> Result<McqAnalytics, CoreError> {
        let by_category =
            GroupByQuery::new(Entity::McqAttempt, "categoryId").aggregate(AggregateSpec::avg("score"));
        let (total_questions, total_attempts, avg_score, categories) = tokio::try_join!(
            self.store.count(Entity::McqQuestion, &Filter::All),
            self.store.count(Entity::McqAttempt, &Filter::All),
            self.store
                .aggregate(Entity::McqAttempt, AggregateSpec::avg("score"), &Filter::All),
            self.store.group_by(&by_category),
        )?;

        let category_breakdown = categories
            .into_iter()
            .map(|g| CategoryBreakdown {
                avg_score: g.values.first().copied().flatten().unwrap_or(0.0),
                category_id: g.key,
                attempts: g.count,
            })
            .collect();

        Ok(McqAnalytics {
            total_questions,
            total_attempts,
            avg_score: avg_score.unwrap_or(0.0),
            category_breakdown,
        })
    }

    async fn referral_analytics(&self) -> Result<ReferralAnalytics, CoreError> {
        let by_referrer = GroupByQuery::new(Entity::Referral, "referrerId");
        let (total_referrals, referrers, total_rewards) = tokio::try_join!(
            self.store.count(Entity::Referral, &Filter::All),
            self.store.group_by(&by_referrer),
            self.store
                .aggregate(Entity::Referral, AggregateSpec::sum("rewardAmount"), &Filter::All),
        )?;

        Ok(ReferralAnalytics {
            total_referrals,
            active_referrers: referrers.len() as u64,
            total_rewards: total_rewards.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{service_with, FlakyStore};
    use chrono::Utc;
    use opsboard_core::models::query::Value;
    use std::sync::Arc;

    fn seed_scores(store: &FlakyStore, scores: &[f64]) {
        let now = Utc::now();
        for (i, score) in scores.iter().enumerate() {
            store
                .inner
                .insert(
                    Entity::UserScore,
                    &[
                        ("id", Value::from(format!("sc{i}").as_str())),
                        ("userId", format!("u{i}").as_str().into()),
                        ("totalScore", (*score).into()),
                        ("updatedAt", now.into()),
                    ],
                )
                .unwrap();
        }
    }

    #[tokio::test]
    async fn empty_store_is_all_zero() {
        let m = service_with(Arc::new(FlakyStore::new()))
            .get_user_behavior_metrics()
            .await
            .unwrap();

        assert_eq!(m.feed_stats.interactions, InteractionSummary::default());
        assert_eq!(m.scorecard_tracking.avg_score, 0.0);
        assert_eq!(m.mcq_analytics.avg_score, 0.0);
        assert!(m.mcq_analytics.category_breakdown.is_empty());
        assert_eq!(m.referral_analytics.total_rewards, 0.0);
        assert!(m.content_performance.top_posts.is_empty());
    }

    #[tokio::test]
    async fn score_bands_have_inclusive_upper_bounds() {
        let store = FlakyStore::new();
        seed_scores(&store, &[0.0, 100.0, 100.5, 500.0, 1000.0, 1000.1, 5000.0]);

        let m = service_with(Arc::new(store))
            .get_user_behavior_metrics()
            .await
            .unwrap();
        let d = m.scorecard_tracking.distribution;

        assert_eq!(d.up_to_100, 2);
        assert_eq!(d.up_to_500, 2);
        assert_eq!(d.up_to_1000, 1);
        assert_eq!(d.above_1000, 2);
        assert_eq!(m.scorecard_tracking.users_with_score, 7);
    }

    #[tokio::test]
    async fn interaction_failure_keeps_feed_counts() {
        let mut store = FlakyStore::new();
        store.fail_native = true;
        let now = Utc::now();
        store
            .inner
            .insert(
                Entity::Post,
                &[
                    ("id", Value::from("p1")),
                    ("title", "Hello".into()),
                    ("isActive", false.into()),
                    ("createdAt", now.into()),
                    ("updatedAt", now.into()),
                ],
            )
            .unwrap();

        let m = service_with(Arc::new(store))
            .get_user_behavior_metrics()
            .await
            .unwrap();

        assert_eq!(m.feed_stats.total_feeds, 1);
        assert_eq!(m.feed_stats.active_feeds, 0);
        assert_eq!(m.feed_stats.interactions, InteractionSummary::default());
    }

    #[tokio::test]
    async fn top_posts_count_likes_and_comments() {
        let store = FlakyStore::new();
        let now = Utc::now();
        store
            .inner
            .insert(
                Entity::Post,
                &[
                    ("id", Value::from("p1")),
                    ("title", "Launch".into()),
                    ("createdAt", now.into()),
                    ("updatedAt", now.into()),
                ],
            )
            .unwrap();
        for (id, kind) in [("i1", "LIKE"), ("i2", "LIKE"), ("i3", "COMMENT"), ("i4", "SHARE")] {
            store
                .inner
                .insert(
                    Entity::PostInteraction,
                    &[
                        ("id", Value::from(id)),
                        ("postId", "p1".into()),
                        ("userId", "u1".into()),
                        ("type", kind.into()),
                        ("createdAt", now.into()),
                    ],
                )
                .unwrap();
        }

        let m = service_with(Arc::new(store))
            .get_user_behavior_metrics()
            .await
            .unwrap();
        let post = &m.content_performance.top_posts[0];

        assert_eq!(post.title, "Launch");
        assert_eq!(post.likes, 2);
        assert_eq!(post.comments, 1);
        assert_eq!(m.feed_stats.interactions.total_likes, 2);
        assert_eq!(m.feed_stats.interactions.posts_with_interactions, 1);
    }
}
