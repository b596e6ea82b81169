//! 참여도 메트릭: 알림, 광고 성과, 연속 활동.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use opsboard_core::error::CoreError;
use opsboard_core::models::analytics::{
    AdsPerformance, EngagementMetrics, NotificationMetrics, StreakInsights,
};
use opsboard_core::models::percent;
use opsboard_core::models::query::{AggregateSpec, Entity, Filter, FindQuery};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::MonitoringError;
use crate::support::try_or_default;
use crate::MonitoringService;

/// 사용자별 활동 날짜 → 연속 활동 요약
///
/// 연속 구간은 하루도 빠지지 않은 날짜 묶음이다. 사용자의 마지막 구간이 `today` 또는
/// 전날에 끝나면 활성으로 본다.
pub fn summarize_streaks(
    activity: &HashMap<String, BTreeSet<NaiveDate>>,
    today: NaiveDate,
) -> StreakInsights {
    let yesterday = today - Duration::days(1);
    let mut longest = 0u64;
    let mut active = Vec::new();

    for days in activity.values() {
        let mut run = 0u64;
        let mut prev: Option<NaiveDate> = None;
        for &day in days {
            run = match prev {
                Some(p) if day - p == Duration::days(1) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }
        if let Some(last) = prev {
            if last == today || last == yesterday {
                active.push(run);
            }
        }
    }

    let avg_streak_length = if active.is_empty() {
        0.0
    } else {
        active.iter().sum::<u64>() as f64 / active.len() as f64
    };

    StreakInsights {
        active_streaks: active.len() as u64,
        avg_streak_length,
        longest_streak: longest,
    }
}

impl MonitoringService {
    /// 참여도 롤업
    pub async fn get_engagement_metrics(&self) -> Result<EngagementMetrics, MonitoringError> {
        let (notifications, ads_performance, streak_insights) = tokio::try_join!(
            self.notification_metrics(),
            self.ads_performance(),
            async {
                Ok::<_, CoreError>(
                    try_or_default(
                        "streak_insights",
                        self.streak_insights(),
                        StreakInsights::default(),
                    )
                    .await,
                )
            },
        )?;

        debug!(
            "참여도: 알림 {}, 노출 {}, 활성 연속 {}",
            notifications.total, ads_performance.impressions, streak_insights.active_streaks
        );

        Ok(EngagementMetrics {
            notifications,
            ads_performance,
            streak_insights,
        })
    }

    async fn notification_metrics(&self) -> Result<NotificationMetrics, CoreError> {
        let recent = Filter::gte("createdAt", Utc::now() - Duration::hours(24));
        let read_filter = Filter::eq("isRead", true);
        let unread_filter = Filter::eq("isRead", false);
        let (total, sent_24h, read, unread) = tokio::try_join!(
            self.store.count(Entity::Notification, &Filter::All),
            self.store.count(Entity::Notification, &recent),
            self.store.count(Entity::Notification, &read_filter),
            self.store.count(Entity::Notification, &unread_filter),
        )?;

        Ok(NotificationMetrics {
            total,
            sent_24h,
            read,
            unread,
            read_rate: percent(read as f64, total as f64),
        })
    }

    async fn ads_performance(&self) -> Result<AdsPerformance, CoreError> {
        let clicked = Filter::eq("clicked", true);
        let (impressions, clicks, revenue) = tokio::try_join!(
            self.store.count(Entity::AdImpression, &Filter::All),
            self.store.count(Entity::AdImpression, &clicked),
            self.store
                .aggregate(Entity::AdImpression, AggregateSpec::sum("revenue"), &Filter::All),
        )?;

        Ok(AdsPerformance {
            impressions,
            clicks,
            ctr: percent(clicks as f64, impressions as f64),
            revenue: revenue.unwrap_or(0.0),
        })
    }

    async fn streak_insights(&self) -> Result<StreakInsights, CoreError> {
        let now = Utc::now();
        let today = now.date_naive();
        let since = (today - Duration::days(self.config.streak_lookback_days))
            .and_time(NaiveTime::MIN)
            .and_utc();

        let rows = self
            .store
            .find_many(
                &FindQuery::new(Entity::UserEvent)
                    .filter(Filter::gte("createdAt", since))
                    .select(&["userId", "createdAt"]),
            )
            .await?;

        let mut activity: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        for row in &rows {
            let Some(user) = row.get("userId").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(at) = row
                .get("createdAt")
                .and_then(|v| v.as_str())
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            else {
                continue;
            };
            activity
                .entry(user.to_string())
                .or_default()
                .insert(at.with_timezone(&Utc).date_naive());
        }

        Ok(summarize_streaks(&activity, today))
    }
}
