//! 인메모리 관측 소스.
//!
//! `ObservationSource` 포트 구현. 호스트(리플레이, 테스트)가 엔트리 배치를
//! 직접 전달한다. 구독자가 없는 유형의 배치는 버퍼에 쌓였다가
//! 첫 구독 시 한 번에 전달된다 (브라우저의 `buffered: true`와 같은 동작).
//! 한 번이라도 구독된 적 있는 유형은 버퍼링하지 않는다. 해제 이후 배치는 버린다.

use async_trait::async_trait;
use pagemon_core::error::CoreError;
use pagemon_core::models::entry::{
    ConnectionInfo, NavigationTimingEntry, ObservationType, PerformanceEntry,
};
use pagemon_core::ports::source::{EntryHandler, ObservationSource, SubscriptionId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, trace};

#[derive(Default)]
struct Registry {
    handlers: BTreeMap<SubscriptionId, (ObservationType, EntryHandler)>,
    buffered: HashMap<ObservationType, Vec<PerformanceEntry>>,
    /// 구독된 적 있는 유형
    observed: HashSet<ObservationType>,
}

/// 유형별 첫 구독 전 버퍼 상한 (엔트리 수)
pub const DEFAULT_BUFFER_CAPACITY: usize = 250;

/// 인메모리 관측 소스
pub struct InMemorySource {
    supported: bool,
    initially_hidden: bool,
    navigation: Option<NavigationTimingEntry>,
    connection: Option<ConnectionInfo>,
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    buffer_capacity: usize,
    tti: watch::Sender<Option<f64>>,
}

impl InMemorySource {
    /// 관측 메커니즘을 지원하는 빈 소스
    pub fn new() -> Self {
        let (tti, _) = watch::channel(None);
        Self {
            supported: true,
            initially_hidden: false,
            navigation: None,
            connection: None,
            registry: Mutex::new(Registry::default()),
            next_id: AtomicU64::new(1),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            tti,
        }
    }

    /// 관측 메커니즘 미지원 환경
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn with_navigation(mut self, entry: NavigationTimingEntry) -> Self {
        self.navigation = Some(entry);
        self
    }

    pub fn with_connection(mut self, info: ConnectionInfo) -> Self {
        self.connection = Some(info);
        self
    }

    /// 첫 구독 전 버퍼 상한 변경. 상한을 넘는 엔트리는 버린다.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// 백그라운드 탭에서 시작
    pub fn starting_hidden(mut self) -> Self {
        self.initially_hidden = true;
        self
    }

    /// 한 관측 유형의 엔트리 배치 전달
    ///
    /// 배치에서 다른 유형의 엔트리는 제외된다. 구독자 목록을 복제한 뒤
    /// 잠금 밖에서 호출하므로 핸들러 안에서 다시 구독해도 된다.
    pub fn deliver(&self, observation: ObservationType, entries: &[PerformanceEntry]) -> usize {
        let batch: Vec<PerformanceEntry> = entries
            .iter()
            .filter(|e| e.observation_type() == observation)
            .cloned()
            .collect();
        if batch.is_empty() {
            return 0;
        }

        let handlers: Vec<EntryHandler> = {
            let mut registry = self.registry.lock();
            let handlers: Vec<EntryHandler> = registry
                .handlers
                .values()
                .filter(|(ty, _)| *ty == observation)
                .map(|(_, h)| h.clone())
                .collect();
            if handlers.is_empty() {
                if registry.observed.contains(&observation) {
                    trace!("{} 구독 해제됨, {}건 폐기", observation, batch.len());
                    return 0;
                }
                let buffer = registry.buffered.entry(observation).or_default();
                let room = self.buffer_capacity.saturating_sub(buffer.len());
                if batch.len() > room {
                    debug!(
                        "{} 버퍼 상한 {} 도달, {}건 폐기",
                        observation,
                        self.buffer_capacity,
                        batch.len() - room
                    );
                }
                trace!("{} 구독자 없음, {}건 버퍼링", observation, batch.len().min(room));
                buffer.extend(batch.into_iter().take(room));
                return 0;
            }
            handlers
        };

        for handler in &handlers {
            handler(&batch);
        }
        handlers.len()
    }

    /// 상호작용 가능 시각 확정 (1회성)
    pub fn resolve_interactivity(&self, value: f64) {
        self.tti.send_replace(Some(value));
    }

    /// 첫 구독을 기다리는 버퍼 엔트리 수
    pub fn buffered_count(&self, observation: ObservationType) -> usize {
        self.registry
            .lock()
            .buffered
            .get(&observation)
            .map_or(0, Vec::len)
    }

    /// 유형별 현재 구독자 수
    pub fn subscriber_count(&self, observation: ObservationType) -> usize {
        self.registry
            .lock()
            .handlers
            .values()
            .filter(|(ty, _)| *ty == observation)
            .count()
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationSource for InMemorySource {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn initially_hidden(&self) -> bool {
        self.initially_hidden
    }

    fn navigation_entry(&self) -> Option<NavigationTimingEntry> {
        self.navigation.clone()
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        self.connection.clone()
    }

    fn observe(
        &self,
        observation: ObservationType,
        handler: EntryHandler,
    ) -> Result<SubscriptionId, CoreError> {
        if !self.supported {
            return Err(CoreError::Unsupported(format!(
                "{} 관측을 지원하지 않습니다",
                observation
            )));
        }

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let buffered = {
            let mut registry = self.registry.lock();
            registry
                .handlers
                .insert(id, (observation, handler.clone()));
            registry.observed.insert(observation);
            registry.buffered.remove(&observation)
        };
        debug!("{} 구독: {:?}", observation, id);

        if let Some(entries) = buffered.filter(|e| !e.is_empty()) {
            handler(&entries);
        }
        Ok(id)
    }

    fn unobserve(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.lock().handlers.remove(&id).is_some();
        if removed {
            debug!("구독 해제: {:?}", id);
        }
        removed
    }

    async fn time_to_interactive(&self) -> Result<f64, CoreError> {
        let mut rx = self.tti.subscribe();
        let value = *rx
            .wait_for(Option::is_some)
            .await
            .map_err(|e| CoreError::Internal(format!("TTI 채널 종료: {e}")))?;
        value.ok_or_else(|| CoreError::Internal("TTI 값 없음".to_string()))
    }
}
