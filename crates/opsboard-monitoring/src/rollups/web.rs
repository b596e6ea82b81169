//! 웹 메트릭: CMS 활동, 관리자 로그, 일별 트래픽.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use futures::future::try_join_all;
use opsboard_core::error::CoreError;
use opsboard_core::models::analytics::{
    AdminLogEntry, CmsActivity, DailyTraffic, TrafficSummary, TrafficTotals, WebMetrics,
};
use opsboard_core::models::query::{Entity, Filter, FindQuery, Include, SortOrder};
use tracing::debug;

use crate::error::MonitoringError;
use crate::MonitoringService;

/// 오늘을 포함한 최근 `days`일의 UTC 자정 (오래된 날짜부터)
pub(crate) fn day_starts(now: DateTime<Utc>, days: i64) -> Vec<DateTime<Utc>> {
    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (0..days.max(0))
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

impl MonitoringService {
    /// 웹 메트릭 롤업
    pub async fn get_web_metrics(&self) -> Result<WebMetrics, MonitoringError> {
        let (cms_activity, admin_logs, traffic_summary) = tokio::try_join!(
            self.cms_activity(),
            self.admin_logs(),
            self.traffic_summary(),
        )?;

        debug!(
            "웹 메트릭: 관리자 로그 {}, {}일 세션 {}",
            admin_logs.len(),
            traffic_summary.last_7_days.len(),
            traffic_summary.total.sessions
        );

        Ok(WebMetrics {
            cms_activity,
            admin_logs,
            traffic_summary,
        })
    }

    async fn cms_activity(&self) -> Result<CmsActivity, CoreError> {
        let since = Utc::now() - Duration::hours(24);
        let created = Filter::gte("createdAt", since);
        let updated = Filter::gte("updatedAt", since);

        let (posts_created, posts_updated, users_created, jobs_created) = tokio::try_join!(
            self.store.count(Entity::Post, &created),
            self.store.count(Entity::Post, &updated),
            self.store.count(Entity::User, &created),
            self.store.count(Entity::JobPost, &created),
        )?;

        Ok(CmsActivity {
            posts_created,
            posts_updated,
            users_created,
            jobs_created,
            last_24h: since,
        })
    }

    async fn admin_logs(&self) -> Result<Vec<AdminLogEntry>, CoreError> {
        let rows = self
            .store
            .find_many(
                &FindQuery::new(Entity::UserEvent)
                    .filter(Filter::contains("eventType", "ADMIN"))
                    .order_by("createdAt", SortOrder::Desc)
                    .take(self.config.admin_log_limit)
                    .include(Include::Relation {
                        name: "user",
                        fields: vec!["id", "email"],
                    }),
            )
            .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(serde_json::Value::Object(row)).map_err(CoreError::from)
            })
            .collect()
    }

    async fn traffic_summary(&self) -> Result<TrafficSummary, CoreError> {
        let days = try_join_all(
            day_starts(Utc::now(), self.config.traffic_days)
                .into_iter()
                .map(|start| self.daily_traffic(start)),
        )
        .await?;

        let total = days.iter().fold(TrafficTotals::default(), |acc, d| TrafficTotals {
            sessions: acc.sessions + d.sessions,
            users: acc.users + d.users,
        });

        Ok(TrafficSummary {
            last_7_days: days,
            total,
        })
    }

    async fn daily_traffic(&self, start: DateTime<Utc>) -> Result<DailyTraffic, CoreError> {
        let within_day = Filter::between("createdAt", start, start + Duration::days(1));
        let (sessions, users) = tokio::try_join!(
            self.store.count(Entity::Session, &within_day),
            self.store.count(Entity::User, &within_day),
        )?;

        Ok(DailyTraffic {
            date: start.format("%Y-%m-%d").to_string(),
            sessions,
            users,
        })
    }
}
