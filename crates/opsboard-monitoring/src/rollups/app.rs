//! 앱 메트릭: 크래시, 활성 사용자, 기능 사용량, 버전 분포.

use chrono::{Duration, Utc};
use opsboard_core::error::CoreError;
use opsboard_core::models::analytics::{AppMetrics, CrashReport, FeatureUsage, VersionShare};
use opsboard_core::models::percent;
use opsboard_core::models::query::{Entity, Filter, FindQuery, GroupByQuery, SortOrder};
use tracing::debug;

use super::key_label;
use crate::error::MonitoringError;
use crate::support::try_or_default;
use crate::MonitoringService;

impl MonitoringService {
    /// 앱 메트릭 롤업
    pub async fn get_app_metrics(&self) -> Result<AppMetrics, MonitoringError> {
        let unexpired = Filter::gt("expiresAt", Utc::now());
        let active = Filter::eq("isActive", true);

        let (active_users, total_users, recent_crashes, feature_usage, version_distribution) = tokio::try_join!(
            self.store.count(Entity::Session, &unexpired),
            self.store.count(Entity::User, &active),
            self.recent_crashes(),
            self.get_feature_usage(),
            async {
                Ok::<_, CoreError>(
                    try_or_default(
                        "version_distribution",
                        self.get_version_distribution(),
                        Vec::new(),
                    )
                    .await,
                )
            },
        )?;

        debug!(
            "앱 메트릭: 크래시 {}, 활성 세션 {active_users}, 기능 {}",
            recent_crashes.len(),
            feature_usage.len()
        );

        Ok(AppMetrics {
            crashes: recent_crashes.len(),
            recent_crashes,
            active_users,
            total_users,
            feature_usage,
            version_distribution,
        })
    }

    async fn recent_crashes(&self) -> Result<Vec<CrashReport>, CoreError> {
        let rows = self
            .store
            .find_many(
                &FindQuery::new(Entity::UserEvent)
                    .filter(Filter::eq("eventType", "ERROR"))
                    .order_by("createdAt", SortOrder::Desc)
                    .take(self.config.recent_crash_limit)
                    .select(&["id", "userId", "eventType", "metadata", "createdAt"]),
            )
            .await?;

        rows.into_iter()
            .map(|row| Ok(serde_json::from_value(serde_json::Value::Object(row))?))
            .collect()
    }

    /// 최근 N일 이벤트 유형별 횟수 (상위 N개, 내림차순)
    pub async fn get_feature_usage(&self) -> Result<Vec<FeatureUsage>, CoreError> {
        let since = Utc::now() - Duration::days(self.config.feature_usage_days);
        let groups = self
            .store
            .group_by(
                &GroupByQuery::new(Entity::UserEvent, "eventType")
                    .filter(Filter::gte("createdAt", since))
                    .top_by_count(self.config.feature_usage_limit),
            )
            .await?;

        Ok(groups
            .into_iter()
            .map(|g| FeatureUsage {
                feature: key_label(&g.key, "unknown"),
                count: g.count,
            })
            .collect())
    }

    /// 활성 세션의 앱 버전 분포 (사용자 수 내림차순)
    pub async fn get_version_distribution(&self) -> Result<Vec<VersionShare>, CoreError> {
        let groups = self
            .store
            .group_by(
                &GroupByQuery::new(Entity::Session, "appVersion")
                    .filter(Filter::gt("expiresAt", Utc::now()))
                    .order_by_count(),
            )
            .await?;

        let total: u64 = groups.iter().map(|g| g.count).sum();
        Ok(groups
            .into_iter()
            .map(|g| VersionShare {
                version: key_label(&g.key, "unknown"),
                users: g.count,
                percent: percent(g.count as f64, total as f64),
            })
            .collect())
    }
}
