//! # pagemon-replay
//!
//! 트레이스 리플레이 바이너리 진입점.

use anyhow::{Context, Result};
use clap::Parser;
use pagemon_core::config::MonitorConfig;
use pagemon_core::config_manager::ConfigManager;
use pagemon_core::ports::sink::MetricSink;
use pagemon_replay::{replay, JsonLinesSink, Trace};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// PAGEMON 트레이스 리플레이
///
/// 기록된 페이지 로드 트레이스를 재생하고 지표 방출을 JSON Lines로 출력한다.
#[derive(Parser, Debug)]
#[command(name = "pagemon-replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 트레이스 파일 (JSON)
    #[arg(long, short = 't')]
    trace: PathBuf,

    /// 설정 파일 경로 (JSON, 존재해야 함)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// `--config` 파일이 없으면 기본 설정으로 생성
    #[arg(long, requires = "config")]
    init_config: bool,

    /// 진단 미러 출력 (설정 파일보다 우선)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// 출력 파일 (기본: 표준 출력)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 방출은 표준 출력으로 나가므로 로그는 표준 에러로 보낸다
    let log_filter = format!(
        "pagemon={},pagemon_core={},pagemon_engine={},pagemon_replay={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            let manager = if args.init_config && !path.exists() {
                ConfigManager::create_default(path)
            } else {
                ConfigManager::open(path)
            }
            .with_context(|| format!("설정 로드 실패: {}", path.display()))?;
            info!("설정 파일: {}", manager.config_path().display());
            manager.into_config()
        }
        None => MonitorConfig::default(),
    };
    if args.verbose {
        config.verbose_logging = true;
    }

    let trace = Trace::load(&args.trace)
        .with_context(|| format!("트레이스 로드 실패: {}", args.trace.display()))?;
    info!(
        "트레이스 로드: {} (이벤트 {}건)",
        args.trace.display(),
        trace.events.len()
    );

    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("출력 파일 생성 실패: {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };
    let sink = Arc::new(JsonLinesSink::new(writer));

    let summary = replay(&trace, config, sink.clone() as Arc<dyn MetricSink>).await?;
    sink.flush().context("출력 flush 실패")?;

    info!(
        "세션 {}: 방출 {}건, TBT {:.1}ms, 숨김 시각 {}",
        summary.session_id,
        sink.written(),
        summary.blocking_total,
        summary.hidden_time
    );
    Ok(())
}
