//! 호스트 리소스 샘플링.
//!
//! `HostMonitor` 포트 구현. sysinfo 기반 프로세스 CPU 시간/메모리, OS 메모리 수집.

use opsboard_core::models::host::HostSample;
use opsboard_core::ports::host::HostMonitor;
use parking_lot::Mutex;
use std::time::Instant;
use sysinfo::{Disks, Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;

/// sysinfo 기반 호스트 모니터: `HostMonitor` 포트 구현
pub struct SysInfoHostMonitor {
    sys: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    disk_stats_enabled: bool,
}

impl SysInfoHostMonitor {
    /// 새 호스트 모니터 생성
    ///
    /// `disk_stats_enabled`가 false면 디스크는 수집하지 않는다.
    pub fn new(disk_stats_enabled: bool) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();

        Self {
            sys: Mutex::new(sys),
            pid: sysinfo::get_current_pid().ok(),
            started: Instant::now(),
            disk_stats_enabled,
        }
    }

    fn disk_totals() -> (u64, u64) {
        let disks = Disks::new_with_refreshed_list();
        disks.list().iter().fold((0u64, 0u64), |(total, free), d| {
            (total + d.total_space(), free + d.available_space())
        })
    }
}

impl Default for SysInfoHostMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

impl HostMonitor for SysInfoHostMonitor {
    fn sample(&self) -> HostSample {
        let mut sys = self.sys.lock();
        sys.refresh_memory();

        let mut sample = HostSample {
            process_uptime_secs: self.started.elapsed().as_secs_f64(),
            cpu_cores: sys.cpus().len(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|b| !b.is_empty()),
            memory_total: sys.total_memory(),
            memory_free: sys.available_memory(),
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            ..Default::default()
        };

        if let Some(pid) = self.pid {
            sys.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu().with_memory(),
            );
            if let Some(process) = sys.process(pid) {
                sample.process_cpu_time_ms = process.accumulated_cpu_time();
                sample.process_rss = process.memory();
                sample.process_virtual = process.virtual_memory();
                // 프로세스 실행 시간이 모니터 생성 이후보다 길면 그것을 사용
                let run_time = process.run_time() as f64;
                if run_time > sample.process_uptime_secs {
                    sample.process_uptime_secs = run_time;
                }
            }
        }
        drop(sys);

        if self.disk_stats_enabled {
            sample.disk = Some(Self::disk_totals());
        }

        debug!(
            "호스트 샘플: 코어 {}, 메모리 {}/{}MB, CPU 시간 {}ms",
            sample.cpu_cores,
            (sample.memory_total - sample.memory_free.min(sample.memory_total)) / 1_048_576,
            sample.memory_total / 1_048_576,
            sample.process_cpu_time_ms
        );

        sample
    }
}
