//! 호스트 리소스 모델.
//!
//! 프로세스/OS 수준 CPU, 메모리, 업타임 수치.

use serde::{Deserialize, Serialize};

/// 호스트 어댑터가 수집한 원시 샘플
///
/// 계산(백분율, 클램프, 포맷팅)은 모니터링 서비스가 담당한다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSample {
    /// 프로세스 누적 CPU 시간 (user + system, 밀리초)
    pub process_cpu_time_ms: u64,
    /// 프로세스 실행 시간 (초)
    pub process_uptime_secs: f64,
    /// 논리 코어 수
    pub cpu_cores: usize,
    /// 첫 번째 코어의 모델명 (알 수 없으면 None)
    pub cpu_model: Option<String>,
    /// 전체 메모리 (바이트)
    pub memory_total: u64,
    /// 가용 메모리 (바이트)
    pub memory_free: u64,
    /// 프로세스 상주 메모리 (바이트)
    pub process_rss: u64,
    /// 프로세스 가상 메모리 (바이트)
    pub process_virtual: u64,
    /// 디스크 (전체, 가용): 수집 비활성 시 None
    pub disk: Option<(u64, u64)>,
    /// 운영체제 이름
    pub platform: String,
    /// CPU 아키텍처
    pub arch: String,
}

/// 서버 메트릭 응답
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMetrics {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disk: DiskMetrics,
    pub uptime: UptimeMetrics,
    /// 서비스 런타임 버전
    pub runtime_version: String,
    pub platform: String,
    pub arch: String,
}

/// CPU 사용량
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    /// 사용률 (0.0 ~ 100.0)
    pub usage: f64,
    pub cores: usize,
    pub model: String,
}

/// 메모리 사용량
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    /// 사용률 (total이 0이면 0)
    pub percent: f64,
    pub process: ProcessMemory,
}

/// 프로세스 메모리
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMemory {
    pub rss: u64,
    pub virtual_memory: u64,
}

/// 디스크 사용량
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

/// 업타임
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UptimeMetrics {
    pub seconds: f64,
    /// "{일}d {시}h {분}m"
    pub formatted: String,
}
