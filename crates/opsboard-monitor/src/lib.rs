//! # opsboard-monitor
//!
//! 런타임 조회 어댑터.
//! sysinfo 기반 프로세스/OS 리소스 샘플링과 인프로세스 작업 큐 카운터를 제공한다.

pub mod host;
pub mod job_queue;
