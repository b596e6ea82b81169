//! 호스트 리소스 포트.
//!
//! 구현: `opsboard-monitor` crate (sysinfo)

use crate::models::host::HostSample;

/// 프로세스/OS 리소스 샘플러
///
/// 인프로세스 조회라 실패 경로가 없다.
pub trait HostMonitor: Send + Sync {
    /// 현재 리소스 샘플 수집
    fn sample(&self) -> HostSample;
}
