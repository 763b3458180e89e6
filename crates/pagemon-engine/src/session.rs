//! 모니터링 세션.
//!
//! 세션 컨텍스트(숨김 시각, 블로킹 합계, 집계 저장소, LCP 추적기)를 명시적으로
//! 생성해 모든 관측 콜백에 공유한다. 전역 상태는 없다.
//!
//! 흐름: 원시 엔트리 → 가시성 게이트 → 정규화 → 병합 → 싱크

use pagemon_core::config::MonitorConfig;
use pagemon_core::error::CoreError;
use pagemon_core::models::entry::{LongTaskEntry, ObservationType, PerformanceEntry};
use pagemon_core::models::metric::MetricKind;
use pagemon_core::models::snapshot::AggregateSnapshot;
use pagemon_core::ports::sink::MetricSink;
use pagemon_core::ports::source::{EntryHandler, ObservationSource, SubscriptionId};
use pagemon_core::ports::timeline::PerformanceTimeline;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dispatch::{DiagnosticMirror, Dispatcher, Emission};
use crate::long_task::LongTaskAccumulator;
use crate::normalize::{self, LcpTracker};
use crate::span::SpanRecorder;
use crate::visibility::VisibilityGate;

/// 세션 공유 상태
pub struct SessionContext {
    config: MonitorConfig,
    gate: VisibilityGate,
    long_tasks: LongTaskAccumulator,
    dispatcher: Dispatcher,
    lcp: Mutex<LcpTracker>,
    /// 롱 태스크 누적 기준 (첫 FCP 시각, 한 번만 설정)
    fcp_anchor: OnceLock<f64>,
    /// 명시적으로 해제된 관측 유형. 이후 다시 구독하지 않는다.
    opted_out: Mutex<HashSet<ObservationType>>,
}

impl SessionContext {
    /// 새 컨텍스트 생성
    pub fn new(
        config: MonitorConfig,
        initially_hidden: bool,
        sink: Option<Arc<dyn MetricSink>>,
    ) -> Self {
        let long_tasks =
            LongTaskAccumulator::new(config.blocking_threshold_ms, config.long_task_log_capacity);
        let dispatcher = Dispatcher::new(sink, DiagnosticMirror::new(config.verbose_logging));
        Self {
            config,
            gate: VisibilityGate::new(initially_hidden),
            long_tasks,
            dispatcher,
            lcp: Mutex::new(LcpTracker::new()),
            fcp_anchor: OnceLock::new(),
            opted_out: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    pub fn long_tasks(&self) -> &LongTaskAccumulator {
        &self.long_tasks
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// 롱 태스크 기준 시각 (FCP 전이면 None)
    pub fn fcp_anchor(&self) -> Option<f64> {
        self.fcp_anchor.get().copied()
    }

    /// 관측 유형 해제 기록
    pub fn opt_out(&self, observation: ObservationType) {
        self.opted_out.lock().insert(observation);
    }

    pub fn is_opted_out(&self, observation: ObservationType) -> bool {
        self.opted_out.lock().contains(&observation)
    }

    fn emit(&self, emission: Emission) {
        let label = emission.label;
        if let Err(e) = self.dispatcher.emit(emission) {
            warn!("지표 방출 실패 ({}): {}", label, e);
        }
    }

    /// 페인트 배치 처리. 이번 배치에서 처음 기준 시각이 잡혔으면 반환.
    pub fn handle_paint(&self, entries: &[PerformanceEntry]) -> Option<f64> {
        let mut anchored = None;
        for entry in entries {
            let PerformanceEntry::Paint(paint) = entry else {
                continue;
            };
            let outcome = normalize::paint(paint);
            if let Some(fcp_time) = outcome.fcp_time {
                if self.fcp_anchor.set(fcp_time).is_ok() {
                    debug!("롱 태스크 기준 시각 설정: {}", fcp_time);
                    anchored = Some(fcp_time);
                }
            }
            self.emit(outcome.emission);
        }
        anchored
    }

    /// 첫 입력 배치 처리
    pub fn handle_first_input(&self, entries: &[PerformanceEntry]) {
        for entry in entries {
            if let PerformanceEntry::FirstInput(input) = entry {
                let emissions =
                    normalize::first_input(input, &self.gate, self.long_tasks.total());
                for emission in emissions {
                    self.emit(emission);
                }
            }
        }
    }

    /// LCP 배치 처리
    pub fn handle_largest_contentful_paint(&self, entries: &[PerformanceEntry]) {
        for entry in entries {
            if let PerformanceEntry::LargestContentfulPaint(lcp) = entry {
                // 잠금 밖에서 방출
                let emission = self.lcp.lock().observe(lcp, &self.gate);
                if let Some(emission) = emission {
                    self.emit(emission);
                }
            }
        }
    }

    /// 레이아웃 시프트 배치 처리
    pub fn handle_layout_shift(&self, entries: &[PerformanceEntry]) {
        if let Some(emission) = normalize::layout_shift(entries) {
            self.emit(emission);
        }
    }

    /// 롱 태스크 배치 처리
    pub fn handle_long_tasks(&self, entries: &[PerformanceEntry], fcp_time: f64) {
        for entry in entries {
            if let PerformanceEntry::LongTask(task) = entry {
                let outcome = self.long_tasks.on_long_task(task, fcp_time);
                debug!("롱 태스크 {:?}: start={}", outcome, task.start_time);
            }
        }
    }

    /// LCP 최종값 방출 (한 번만)
    pub fn finalize_lcp(&self) -> bool {
        let emission = self.lcp.lock().finalize();
        match emission {
            Some(emission) => {
                self.emit(emission);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("hidden_time", &self.gate.hidden_time())
            .field("blocking_total", &self.long_tasks.total())
            .field("fcp_anchor", &self.fcp_anchor())
            .finish()
    }
}

type Subscriptions = Arc<Mutex<HashMap<ObservationType, SubscriptionId>>>;

/// 모니터링 세션 핸들
///
/// 복제해도 같은 세션을 가리킨다. 명시적 종료(`shutdown`) 전까지
/// 각 구독은 세션 수명 동안 유지된다.
#[derive(Clone)]
pub struct MonitorSession {
    id: Uuid,
    ctx: Arc<SessionContext>,
    source: Arc<dyn ObservationSource>,
    subscriptions: Subscriptions,
    active: bool,
}

impl MonitorSession {
    /// 세션 시작
    ///
    /// 관측 메커니즘이 없으면 진단을 한 번 남기고 비활성 세션을 반환한다.
    /// 이 상태는 세션 동안 복구되지 않는다.
    pub fn start(
        config: MonitorConfig,
        source: Arc<dyn ObservationSource>,
        sink: Option<Arc<dyn MetricSink>>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let initially_hidden = source.initially_hidden();
        let ctx = Arc::new(SessionContext::new(config, initially_hidden, sink));
        let mut session = Self {
            id: Uuid::new_v4(),
            ctx,
            source,
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
            active: false,
        };

        if !session.source.is_supported() {
            warn!("관측 메커니즘 미지원, 세션 비활성 ({})", session.id);
            session
                .ctx
                .dispatcher
                .mirror()
                .message("Performance API를 지원하지 않는 환경입니다");
            return Ok(session);
        }
        session.active = true;

        info!(
            "모니터링 세션 시작: {} (initially_hidden={})",
            session.id, initially_hidden
        );

        let navigation = session.source.navigation_entry();
        session
            .ctx
            .emit(normalize::navigation_timing(navigation.as_ref()));
        let connection = session.source.connection_info();
        session.ctx.emit(normalize::network_info(connection.as_ref()));

        for observation in ObservationType::SESSION {
            if let Some(handler) = session.handler_for(observation) {
                session.subscribe(observation, handler)?;
            }
        }

        Ok(session)
    }

    /// 세션 시작 시 구독하는 유형의 핸들러. 롱 태스크는 첫 FCP 이후 따로 구독하므로 None.
    fn handler_for(&self, observation: ObservationType) -> Option<EntryHandler> {
        let ctx = Arc::clone(&self.ctx);
        let handler: EntryHandler = match observation {
            ObservationType::Paint => {
                let source = Arc::downgrade(&self.source);
                let subscriptions = Arc::clone(&self.subscriptions);
                Arc::new(move |entries: &[PerformanceEntry]| {
                    if let Some(fcp_time) = ctx.handle_paint(entries) {
                        subscribe_long_tasks(&ctx, &source, &subscriptions, fcp_time);
                    }
                })
            }
            ObservationType::FirstInput => {
                Arc::new(move |entries: &[PerformanceEntry]| ctx.handle_first_input(entries))
            }
            ObservationType::LargestContentfulPaint => Arc::new(move |entries: &[PerformanceEntry]| {
                ctx.handle_largest_contentful_paint(entries)
            }),
            ObservationType::LayoutShift => {
                Arc::new(move |entries: &[PerformanceEntry]| ctx.handle_layout_shift(entries))
            }
            ObservationType::LongTask => return None,
        };
        Some(handler)
    }

    fn subscribe(
        &self,
        observation: ObservationType,
        handler: EntryHandler,
    ) -> Result<(), CoreError> {
        // 버퍼된 엔트리가 observe 안에서 동기 전달될 수 있으므로 잠금을 잡지 않는다
        let id = self.source.observe(observation, handler)?;
        self.subscriptions.lock().insert(observation, id);
        Ok(())
    }

    /// 페이지 숨김 전환 (1회성 visibilitychange)
    pub fn on_hidden(&self, timestamp: f64) -> f64 {
        self.ctx.gate.on_hidden(timestamp)
    }

    /// 상호작용 가능 시각을 기다렸다가 TTI 방출
    ///
    /// 비활성 세션이면 소스를 기다리지 않고 `Ok(None)`.
    pub async fn await_interactivity(&self) -> Result<Option<MetricKind>, CoreError> {
        if !self.active {
            return Ok(None);
        }
        let value = self.source.time_to_interactive().await?;
        self.ctx.dispatcher.emit(normalize::interactivity(value))
    }

    /// 관측 유형 구독 해제. LCP 해제 시 최종값을 방출한다.
    ///
    /// 존재하던 구독이면 true. 아직 구독 전인 유형(FCP 이전의 롱 태스크)도
    /// 해제로 기록되어 이후 구독되지 않는다.
    pub fn unsubscribe(&self, observation: ObservationType) -> bool {
        self.ctx.opt_out(observation);
        if observation == ObservationType::LargestContentfulPaint {
            self.ctx.finalize_lcp();
        }
        let id = self.subscriptions.lock().remove(&observation);
        match id {
            Some(id) => {
                debug!("{} 구독 해제", observation);
                self.source.unobserve(id)
            }
            None => false,
        }
    }

    /// LCP 스트림 종료 처리 (최종값 1회 방출)
    pub fn finalize_lcp(&self) -> bool {
        self.ctx.finalize_lcp()
    }

    /// 세션 종료: LCP 확정 후 모든 구독 해제
    pub fn shutdown(&self) {
        if !self.active {
            return;
        }
        for observation in ObservationType::SESSION {
            self.ctx.opt_out(observation);
        }
        self.ctx.opt_out(ObservationType::LongTask);
        self.ctx.finalize_lcp();
        let subscriptions: Vec<(ObservationType, SubscriptionId)> =
            self.subscriptions.lock().drain().collect();
        for (observation, id) in subscriptions {
            self.source.unobserve(id);
            debug!("{} 구독 해제 (종료)", observation);
        }
        info!("모니터링 세션 종료: {}", self.id);
    }

    /// 수동 구간 측정기
    pub fn span_recorder(&self, timeline: Arc<dyn PerformanceTimeline>) -> SpanRecorder {
        SpanRecorder::new(Arc::clone(&self.ctx), timeline)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 관측 메커니즘 사용 가능 여부
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_subscribed(&self, observation: ObservationType) -> bool {
        self.subscriptions.lock().contains_key(&observation)
    }

    /// 현재 집계 스냅샷
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.ctx.dispatcher.snapshot()
    }

    pub fn blocking_total(&self) -> f64 {
        self.ctx.long_tasks.total()
    }

    pub fn hidden_time(&self) -> f64 {
        self.ctx.gate.hidden_time()
    }

    /// 수락된 롱 태스크 진단 목록
    pub fn long_task_log(&self) -> Vec<LongTaskEntry> {
        self.ctx.long_tasks.log()
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.ctx
    }
}

impl std::fmt::Debug for MonitorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSession")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("ctx", &self.ctx)
            .finish()
    }
}

/// 첫 FCP 이후 롱 태스크 구독
fn subscribe_long_tasks(
    ctx: &Arc<SessionContext>,
    source: &Weak<dyn ObservationSource>,
    subscriptions: &Subscriptions,
    fcp_time: f64,
) {
    if ctx.is_opted_out(ObservationType::LongTask) {
        debug!("롱 태스크 구독 해제 상태, 구독 생략");
        return;
    }
    let Some(source) = source.upgrade() else {
        return;
    };
    let handler_ctx = Arc::clone(ctx);
    let handler: EntryHandler = Arc::new(move |entries: &[PerformanceEntry]| {
        handler_ctx.handle_long_tasks(entries, fcp_time)
    });

    match source.observe(ObservationType::LongTask, handler) {
        Ok(id) => {
            subscriptions.lock().insert(ObservationType::LongTask, id);
            // observe 도중 해제된 경우
            if ctx.is_opted_out(ObservationType::LongTask) {
                subscriptions.lock().remove(&ObservationType::LongTask);
                source.unobserve(id);
                return;
            }
            debug!("롱 태스크 구독 시작 (기준 {}ms)", fcp_time);
        }
        Err(e) => warn!("롱 태스크 구독 실패: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use pagemon_core::models::entry::PaintEntry;

    fn fcp(start_time: f64) -> PerformanceEntry {
        PerformanceEntry::Paint(PaintEntry {
            name: "first-contentful-paint".to_string(),
            start_time,
        })
    }

    #[test]
    fn start_subscribes_session_types() {
        let source = Arc::new(InMemorySource::new());
        let session = MonitorSession::start(MonitorConfig::default(), source.clone(), None).unwrap();

        assert!(session.is_active());
        for observation in ObservationType::SESSION {
            assert!(session.is_subscribed(observation));
            assert_eq!(source.subscriber_count(observation), 1);
        }
        assert!(!session.is_subscribed(ObservationType::LongTask));

        let snapshot = session.snapshot();
        assert!(snapshot.get(MetricKind::NavigationTime).unwrap().is_unavailable());
        assert!(snapshot.get(MetricKind::NetworkInfo).unwrap().is_unavailable());
    }

    #[test]
    fn second_fcp_does_not_resubscribe() {
        let source = Arc::new(InMemorySource::new());
        let session = MonitorSession::start(MonitorConfig::default(), source.clone(), None).unwrap();

        source.deliver(ObservationType::Paint, &[fcp(800.0)]);
        source.deliver(ObservationType::Paint, &[fcp(900.0)]);

        assert_eq!(source.subscriber_count(ObservationType::LongTask), 1);
        assert_eq!(session.context().fcp_anchor(), Some(800.0));
    }

    #[test]
    fn unsupported_source_is_inert() {
        let source = Arc::new(InMemorySource::unsupported());
        let session = MonitorSession::start(MonitorConfig::default(), source, None).unwrap();

        assert!(!session.is_active());
        assert!(session.snapshot().is_empty());
        session.shutdown();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MonitorConfig {
            measure_prefix: String::new(),
            ..MonitorConfig::default()
        };
        let result = MonitorSession::start(config, Arc::new(InMemorySource::new()), None);
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn shutdown_releases_everything() {
        let source = Arc::new(InMemorySource::new());
        let session = MonitorSession::start(MonitorConfig::default(), source.clone(), None).unwrap();
        source.deliver(ObservationType::Paint, &[fcp(500.0)]);

        session.shutdown();
        for observation in ObservationType::SESSION {
            assert_eq!(source.subscriber_count(observation), 0);
        }
        assert_eq!(source.subscriber_count(ObservationType::LongTask), 0);
    }

    #[test]
    fn long_task_opt_out_before_fcp_is_honored() {
        let source = Arc::new(InMemorySource::new());
        let session = MonitorSession::start(MonitorConfig::default(), source.clone(), None).unwrap();

        assert!(!session.unsubscribe(ObservationType::LongTask));
        source.deliver(ObservationType::Paint, &[fcp(5.0)]);
        source.deliver(
            ObservationType::LongTask,
            &[PerformanceEntry::LongTask(LongTaskEntry {
                name: "self".to_string(),
                start_time: 10.0,
                duration: 80.0,
            })],
        );

        assert!(!session.is_subscribed(ObservationType::LongTask));
        assert_eq!(source.subscriber_count(ObservationType::LongTask), 0);
        assert_eq!(session.blocking_total(), 0.0);
    }

    #[test]
    fn session_types_are_subscribed_at_start_except_long_tasks() {
        let session = MonitorSession::start(
            MonitorConfig::default(),
            Arc::new(InMemorySource::new()),
            None,
        )
        .unwrap();
        assert!(session.handler_for(ObservationType::LongTask).is_none());
        for observation in ObservationType::SESSION {
            assert!(session.handler_for(observation).is_some());
        }
    }
}
