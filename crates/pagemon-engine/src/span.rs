//! 수동 구간 측정 (User Timing 패스스루).
//!
//! 측정 결과는 모두 측정 전용으로 디스패치되어 싱크에 도달하지 않는다.

use pagemon_core::error::CoreError;
use pagemon_core::models::record::{MetricRecord, TimingRecord};
use pagemon_core::models::span::{TimelineEntry, TimelineEntryType};
use pagemon_core::ports::timeline::PerformanceTimeline;
use std::sync::Arc;
use tracing::debug;

use crate::dispatch::labels;
use crate::session::SessionContext;

const FMP_START: &str = "fmp-start";
const FMP_END: &str = "fmp-end";
const FMP_MEASURE: &str = "fmp";

/// 세션에 묶인 수동 구간 측정기
pub struct SpanRecorder {
    ctx: Arc<SessionContext>,
    timeline: Arc<dyn PerformanceTimeline>,
}

impl SpanRecorder {
    pub fn new(ctx: Arc<SessionContext>, timeline: Arc<dyn PerformanceTimeline>) -> Self {
        Self { ctx, timeline }
    }

    /// 구간 시작 마크
    pub fn mark_start(&self, name: &str) -> Result<TimelineEntry, CoreError> {
        self.timeline.mark(name)
    }

    /// 구간 종료
    ///
    /// `end` 마크를 찍고 `{prefix}-{start}` 이름으로 측정한다.
    /// 같은 이름의 측정이 여러 개면 모두 디스패치된다.
    pub fn mark_end(&self, start: &str, end: &str) -> Result<Vec<TimelineEntry>, CoreError> {
        self.timeline.mark(end)?;
        let name = self.ctx.config().measure_name(start);
        self.timeline.measure(&name, start, end)?;
        Ok(self.dispatch_measures(&name))
    }

    pub fn clear_marks(&self, name: Option<&str>) {
        self.timeline.clear_marks(name);
    }

    /// 측정 제거. 이름이 있으면 생성 때와 같은 접두사를 붙인다.
    pub fn clear_measures(&self, name: Option<&str>) {
        match name {
            Some(name) => {
                let measure = self.ctx.config().measure_name(name);
                self.timeline.clear_measures(Some(&measure));
            }
            None => self.timeline.clear_measures(None),
        }
    }

    /// 첫 의미 있는 페인트 구간 시작
    pub fn fmp_start(&self) -> Result<TimelineEntry, CoreError> {
        self.timeline.mark(FMP_START)
    }

    /// 첫 의미 있는 페인트 구간 종료. "FMP" 레이블로 측정 전용 방출.
    pub fn fmp_end(&self) -> Result<Vec<TimelineEntry>, CoreError> {
        self.timeline.mark(FMP_END)?;
        self.timeline.measure(FMP_MEASURE, FMP_START, FMP_END)?;

        let measures: Vec<TimelineEntry> = self
            .timeline
            .entries_by_name(FMP_MEASURE)
            .into_iter()
            .filter(|e| e.entry_type == TimelineEntryType::Measure)
            .collect();
        for measure in &measures {
            self.dispatch_measure_only(labels::FMP, measure.duration);
        }
        Ok(measures)
    }

    fn dispatch_measures(&self, name: &str) -> Vec<TimelineEntry> {
        let measures: Vec<TimelineEntry> = self
            .timeline
            .entries_by_name(name)
            .into_iter()
            .filter(|e| e.entry_type == TimelineEntryType::Measure)
            .collect();
        for measure in &measures {
            self.dispatch_measure_only(name, measure.duration);
        }
        measures
    }

    fn dispatch_measure_only(&self, label: &str, duration: f64) {
        let record = MetricRecord::Timing(TimingRecord {
            time: duration,
            score: None,
        });
        // 측정 전용은 레이블 조회를 하지 않으므로 실패하지 않는다
        if let Err(e) = self.ctx.dispatcher().dispatch(label, record, true) {
            debug!("측정 방출 실패 ({}): {}", label, e);
        }
    }
}

impl std::fmt::Debug for SpanRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanRecorder")
            .field("prefix", &self.ctx.config().measure_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{Clock, InMemoryTimeline};
    use pagemon_core::config::MonitorConfig;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn recorder() -> (SpanRecorder, Arc<InMemoryTimeline>) {
        let ticks = Arc::new(AtomicU64::new(0));
        let clock: Clock = Arc::new(move || ticks.fetch_add(1, Ordering::Relaxed) as f64 * 25.0);
        let timeline = Arc::new(InMemoryTimeline::with_clock(clock));
        let ctx = Arc::new(SessionContext::new(MonitorConfig::default(), false, None));
        (SpanRecorder::new(ctx, timeline.clone()), timeline)
    }

    #[test]
    fn mark_end_measures_with_prefix() {
        let (spans, timeline) = recorder();
        spans.mark_start("checkout").unwrap();

        let measures = spans.mark_end("checkout", "checkout-done").unwrap();
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].name, "pagemon-checkout");
        assert_eq!(measures[0].duration, 25.0);
        assert_eq!(timeline.entries_by_name("pagemon-checkout").len(), 1);
    }

    #[test]
    fn clear_measures_uses_creation_prefix() {
        let (spans, timeline) = recorder();
        spans.mark_start("checkout").unwrap();
        spans.mark_end("checkout", "checkout-done").unwrap();

        spans.clear_measures(Some("checkout"));
        assert!(timeline.entries_by_name("pagemon-checkout").is_empty());
    }

    #[test]
    fn mark_end_without_start_fails() {
        let (spans, _) = recorder();
        let result = spans.mark_end("missing", "missing-end");
        assert!(matches!(result, Err(CoreError::MarkNotFound(ref n)) if n == "missing"));
    }

    #[test]
    fn fmp_pair_never_reaches_store() {
        let (spans, _) = recorder();
        spans.fmp_start().unwrap();
        let measures = spans.fmp_end().unwrap();

        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].duration, 25.0);
        assert!(spans.ctx.dispatcher().snapshot().is_empty());
    }
}
