//! 서버 리소스 프로브.
//!
//! 어댑터의 원시 샘플에서 백분율, 클램프, 포맷팅을 계산한다. 실패 경로가 없다.

use opsboard_core::models::host::{
    CpuMetrics, DiskMetrics, HostSample, MemoryMetrics, ProcessMemory, ServerMetrics,
    UptimeMetrics,
};
use opsboard_core::models::percent;
use tracing::debug;

use crate::MonitoringService;

/// 프로세스 CPU 사용률 = CPU 시간 / 실행 시간, [0, 100]으로 클램프
///
/// 멀티코어 누적으로 100을 넘는 값과 실행 시간 0 근처의 발산을 모두 막는다.
pub fn cpu_percent(cpu_time_ms: u64, uptime_secs: f64) -> f64 {
    if !uptime_secs.is_finite() || uptime_secs <= 0.0 {
        return 0.0;
    }
    let pct = (cpu_time_ms as f64 / 1000.0) / uptime_secs * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// 초 → "{일}d {시}h {분}m" (내림)
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}

/// 원시 샘플 → 응답 모델
pub fn build_server_metrics(sample: &HostSample) -> ServerMetrics {
    let free = sample.memory_free.min(sample.memory_total);
    let used = sample.memory_total - free;

    let disk = match sample.disk {
        Some((total, available)) => {
            let free = available.min(total);
            DiskMetrics {
                total,
                used: total - free,
                free,
                percent: percent((total - free) as f64, total as f64),
            }
        }
        None => DiskMetrics::default(),
    };

    ServerMetrics {
        cpu: CpuMetrics {
            usage: cpu_percent(sample.process_cpu_time_ms, sample.process_uptime_secs),
            cores: sample.cpu_cores,
            model: sample
                .cpu_model
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        },
        memory: MemoryMetrics {
            total: sample.memory_total,
            used,
            free,
            percent: percent(used as f64, sample.memory_total as f64),
            process: ProcessMemory {
                rss: sample.process_rss,
                virtual_memory: sample.process_virtual,
            },
        },
        disk,
        uptime: UptimeMetrics {
            seconds: sample.process_uptime_secs,
            formatted: format_uptime(sample.process_uptime_secs),
        },
        runtime_version: format!("v{}", env!("CARGO_PKG_VERSION")),
        platform: sample.platform.clone(),
        arch: sample.arch.clone(),
    }
}

impl MonitoringService {
    /// 서버 리소스 메트릭
    pub fn get_server_metrics(&self) -> ServerMetrics {
        let metrics = build_server_metrics(&self.host.sample());
        debug!(
            "서버 메트릭: CPU {:.1}%, 메모리 {:.1}%, 업타임 {}",
            metrics.cpu.usage, metrics.memory.percent, metrics.uptime.formatted
        );
        metrics
    }
}
