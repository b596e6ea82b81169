//! # opsboard-app
//!
//! OPSBOARD 서버 바이너리 진입점.
//! 설정 로드, DI 와이어링, 백그라운드 작업, 라이프사이클 관리.

mod latency_flush;
mod lifecycle;
mod wiring;

use anyhow::{Context, Result};
use clap::Parser;
use opsboard_core::config_manager::ConfigManager;
use opsboard_web::WebServer;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// OPSBOARD 관리자 모니터링 서버
///
/// 호스트/캐시/DB/큐 상태와 분석 롤업을 HTTP API로 제공한다.
#[derive(Parser, Debug)]
#[command(name = "opsboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// HTTP 포트 (설정 파일 값 덮어쓰기)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 데이터 저장 경로
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 인메모리 DB 사용 (재시작 시 데이터 소실)
    #[arg(long)]
    in_memory: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

fn load_config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    match path {
        Some(path) => ConfigManager::with_path(path).context("설정 파일 로드 실패"),
        None => ConfigManager::new().or_else(|e| {
            warn!("플랫폼 설정 경로 사용 불가, 현재 디렉토리 사용: {e}");
            ConfigManager::with_path(PathBuf::from("config.json")).context("설정 관리자 생성 실패")
        }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "opsboard={lvl},opsboard_app={lvl},opsboard_core={lvl},opsboard_monitor={lvl},opsboard_storage={lvl},opsboard_monitoring={lvl},opsboard_web={lvl},tower_http={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("OPSBOARD 시작 (v{})", env!("CARGO_PKG_VERSION"));

    // 설정 로드 + CLI 오버라이드
    let config_manager = load_config_manager(args.config)?;
    info!("설정 파일: {}", config_manager.config_path().display());

    let mut config = config_manager.get();
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = Some(dir);
    }
    if args.in_memory {
        config.storage.in_memory = true;
    }

    // ── 어댑터 생성 (DI 와이어링) ──
    let services = wiring::build_services(&config)?;
    let lifecycle = LifecycleManager::new();

    // 지연 시간 스냅샷 주기 게시
    tokio::spawn(latency_flush::run_latency_flush(
        services.monitoring.clone(),
        services.latency.clone(),
        Duration::from_secs(config.monitoring.latency_flush_secs),
        lifecycle.subscribe(),
    ));

    // ── 모니터링 API 서버 ──
    if config.web.enabled {
        let web_server = WebServer::new(
            services.monitoring.clone(),
            services.latency.clone(),
            config.web.clone(),
        );
        let web_shutdown_rx = lifecycle.subscribe();
        info!("모니터링 API: {}/api/admin/monitoring", web_server.url());
        tokio::spawn(async move {
            if let Err(e) = web_server.run(web_shutdown_rx).await {
                error!("웹 서버 오류: {e}");
            }
        });
    } else {
        warn!("웹 서버 비활성화 (web.enabled = false)");
    }

    info!("OPSBOARD 실행 중 (Ctrl+C로 종료)");
    lifecycle.wait_for_signal().await;

    // 종료 신호 전파 후 백그라운드 작업 정리 대기
    tokio::time::sleep(Duration::from_millis(200)).await;
    info!("OPSBOARD 종료");
    Ok(())
}
