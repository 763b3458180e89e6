//! 트레이스 재생.

use anyhow::{Context, Result};
use pagemon_core::config::MonitorConfig;
use pagemon_core::models::snapshot::AggregateSnapshot;
use pagemon_core::ports::sink::MetricSink;
use pagemon_engine::{InMemoryTimeline, MonitorSession, SpanRecorder};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::trace::{Trace, TraceEvent};

/// 재생 결과 요약
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub session_id: Uuid,
    pub active: bool,
    pub events_replayed: usize,
    pub snapshot: AggregateSnapshot,
    pub blocking_total: f64,
    pub hidden_time: f64,
}

/// 트레이스 하나를 새 세션에 재생
///
/// 이벤트를 순서대로 전달한 뒤 상호작용 가능 시각을 확정하고,
/// 세션을 종료해 LCP 최종값을 방출한다.
pub async fn replay(
    trace: &Trace,
    config: MonitorConfig,
    sink: Arc<dyn MetricSink>,
) -> Result<ReplaySummary> {
    let source = Arc::new(trace.source());
    let session = MonitorSession::start(config, source.clone(), Some(sink))
        .context("모니터링 세션 시작 실패")?;

    if !session.is_active() {
        warn!("관측 미지원 트레이스, 이벤트 {}건 건너뜀", trace.events.len());
        return Ok(summarize(&session, 0));
    }

    let waiter = {
        let session = session.clone();
        tokio::spawn(async move { session.await_interactivity().await })
    };

    let spans = session.span_recorder(Arc::new(InMemoryTimeline::new()));
    for (index, event) in trace.events.iter().enumerate() {
        apply(&session, &source, &spans, event)
            .with_context(|| format!("이벤트 #{} 재생 실패", index))?;
    }

    match trace.time_to_interactive {
        Some(value) => {
            source.resolve_interactivity(value);
            waiter
                .await
                .context("TTI 대기 태스크 실패")?
                .context("TTI 방출 실패")?;
        }
        None => {
            debug!("트레이스에 TTI 없음");
            waiter.abort();
        }
    }

    session.shutdown();
    let summary = summarize(&session, trace.events.len());
    info!(
        "재생 완료: 이벤트 {}건, 지표 {}종",
        summary.events_replayed,
        summary.snapshot.len()
    );
    Ok(summary)
}

fn apply(
    session: &MonitorSession,
    source: &pagemon_engine::InMemorySource,
    spans: &SpanRecorder,
    event: &TraceEvent,
) -> Result<()> {
    match event {
        TraceEvent::Observe { kind, entries } => {
            let delivered = source.deliver(*kind, entries);
            debug!("{} 배치 {}건 → 구독자 {}", kind, entries.len(), delivered);
        }
        TraceEvent::Hidden { timestamp } => {
            session.on_hidden(*timestamp);
        }
        TraceEvent::Unsubscribe { kind } => {
            session.unsubscribe(*kind);
        }
        TraceEvent::MarkStart { name } => {
            spans.mark_start(name)?;
        }
        TraceEvent::MarkEnd { start, end } => {
            spans.mark_end(start, end)?;
        }
        TraceEvent::ClearMarks { name } => spans.clear_marks(name.as_deref()),
        TraceEvent::ClearMeasures { name } => spans.clear_measures(name.as_deref()),
        TraceEvent::FmpStart => {
            spans.fmp_start()?;
        }
        TraceEvent::FmpEnd => {
            spans.fmp_end()?;
        }
    }
    Ok(())
}

fn summarize(session: &MonitorSession, events_replayed: usize) -> ReplaySummary {
    ReplaySummary {
        session_id: session.id(),
        active: session.is_active(),
        events_replayed,
        snapshot: session.snapshot(),
        blocking_total: session.blocking_total(),
        hidden_time: session.hidden_time(),
    }
}
