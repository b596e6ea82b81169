//! 애플리케이션 설정 구조체.
//!
//! 웹 서버, 저장소 경로, 캐시 프로브, 모니터링 집계 파라미터를 정의한다.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 대시보드 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 관계형 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 캐시 저장소 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 모니터링 집계 설정
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

// ============================================================
// 웹 설정
// ============================================================

/// 웹 대시보드 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 바인드 포트
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접속 허용 (false면 127.0.0.1만)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// SQLite 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 데이터 디렉토리 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// DB 파일 이름
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    /// 인메모리 DB 사용 (데모/테스트용)
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file_name: default_db_file_name(),
            in_memory: false,
        }
    }
}

// ============================================================
// 캐시 설정
// ============================================================

/// 캐시 프로브/제어 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// ping 타임아웃 (밀리초)
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
    /// 키 삭제 배치 크기
    #[serde(default = "default_delete_batch_size")]
    pub delete_batch_size: usize,
    /// API 지연 시간 스냅샷 키
    #[serde(default = "default_latency_stats_key")]
    pub latency_stats_key: String,
}

impl CacheConfig {
    /// ping 타임아웃 Duration
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ping_timeout_ms: default_ping_timeout_ms(),
            delete_batch_size: default_delete_batch_size(),
            latency_stats_key: default_latency_stats_key(),
        }
    }
}

// ============================================================
// 모니터링 설정
// ============================================================

/// 모니터링 집계 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// 보고할 작업 큐 이름
    #[serde(default = "default_queue_names")]
    pub queue_names: Vec<String>,
    /// 디스크 사용량 수집 (기본 비활성, 비활성 시 0 보고)
    #[serde(default)]
    pub disk_stats_enabled: bool,
    /// 최근 크래시 조회 개수
    #[serde(default = "default_ten")]
    pub recent_crash_limit: usize,
    /// 기능 사용량 집계 기간 (일)
    #[serde(default = "default_seven")]
    pub feature_usage_days: i64,
    /// 기능 사용량 상위 N개
    #[serde(default = "default_ten")]
    pub feature_usage_limit: usize,
    /// 관리자 로그 조회 개수
    #[serde(default = "default_admin_log_limit")]
    pub admin_log_limit: usize,
    /// 트래픽 요약 기간 (일)
    #[serde(default = "default_seven")]
    pub traffic_days: i64,
    /// 콘텐츠 성과 상위 N개
    #[serde(default = "default_ten")]
    pub top_posts_limit: usize,
    /// 테이블 크기 상위 N개
    #[serde(default = "default_ten")]
    pub largest_tables_limit: usize,
    /// 연속 활동 계산 기간 (일)
    #[serde(default = "default_streak_lookback_days")]
    pub streak_lookback_days: i64,
    /// 지연 시간 샘플 윈도우 크기
    #[serde(default = "default_latency_window")]
    pub latency_window: usize,
    /// 지연 시간 스냅샷 게시 주기 (초)
    #[serde(default = "default_latency_flush_secs")]
    pub latency_flush_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            queue_names: default_queue_names(),
            disk_stats_enabled: false,
            recent_crash_limit: default_ten(),
            feature_usage_days: default_seven(),
            feature_usage_limit: default_ten(),
            admin_log_limit: default_admin_log_limit(),
            traffic_days: default_seven(),
            top_posts_limit: default_ten(),
            largest_tables_limit: default_ten(),
            streak_lookback_days: default_streak_lookback_days(),
            latency_window: default_latency_window(),
            latency_flush_secs: default_latency_flush_secs(),
        }
    }
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            web: WebConfig::default(),
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_web_port() -> u16 {
    9090
}
fn default_db_file_name() -> String {
    "opsboard.db".to_string()
}
fn default_ping_timeout_ms() -> u64 {
    2_000
}
fn default_delete_batch_size() -> usize {
    1_000
}
fn default_latency_stats_key() -> String {
    "api:latency:stats".to_string()
}
fn default_queue_names() -> Vec<String> {
    ["email", "sms", "notification", "analytics"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_ten() -> usize {
    10
}
fn default_seven() -> i64 {
    7
}
fn default_admin_log_limit() -> usize {
    50
}
fn default_streak_lookback_days() -> i64 {
    30
}
fn default_latency_window() -> usize {
    1_000
}
fn default_latency_flush_secs() -> u64 {
    10
}
