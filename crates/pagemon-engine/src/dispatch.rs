//! 디스패치.
//!
//! 사람이 읽는 레이블 → 지표 종류 변환, 저장소 병합, 외부 싱크 호출.
//! 측정 전용(measure-only) 방출은 병합/싱크 없이 진단 미러에만 남는다.

use pagemon_core::error::CoreError;
use pagemon_core::models::metric::MetricKind;
use pagemon_core::models::record::MetricRecord;
use pagemon_core::models::snapshot::AggregateSnapshot;
use pagemon_core::ports::sink::MetricSink;
use std::sync::Arc;
use tracing::{debug, info};

use crate::store::AggregationStore;

/// 방출 레이블
pub mod labels {
    pub const NAVIGATION_TIME: &str = "Navigation Time";
    pub const NETWORK_INFO: &str = "Network Info";
    pub const FCP: &str = "FCP";
    pub const FP: &str = "FP";
    pub const LCP_UPDATE: &str = "LCP Update";
    pub const LCP_FINAL: &str = "LCP Final";
    pub const CLS_UPDATE: &str = "CLS Update";
    pub const TBT: &str = "TBT";
    pub const FID: &str = "FID";
    pub const TTI: &str = "TTI";
    pub const FMP: &str = "FMP";
}

/// 레이블 → 지표 종류 (고정 테이블)
const LABEL_TABLE: [(&str, MetricKind); 11] = [
    (labels::NAVIGATION_TIME, MetricKind::NavigationTime),
    (labels::NETWORK_INFO, MetricKind::NetworkInfo),
    (labels::FCP, MetricKind::Fcp),
    (labels::FP, MetricKind::Fp),
    (labels::LCP_UPDATE, MetricKind::Lcp),
    (labels::LCP_FINAL, MetricKind::Lcp),
    (labels::CLS_UPDATE, MetricKind::Cls),
    (labels::TBT, MetricKind::Tbt),
    (labels::FID, MetricKind::Fid),
    (labels::TTI, MetricKind::Tti),
    (labels::FMP, MetricKind::Fmp),
];

/// 레이블로 지표 종류 조회
pub fn kind_for_label(label: &str) -> Option<MetricKind> {
    LABEL_TABLE
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, kind)| *kind)
}

/// 정규화기가 만든 방출 단위
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub label: &'static str,
    pub record: MetricRecord,
}

impl Emission {
    pub fn new(label: &'static str, record: MetricRecord) -> Self {
        Self { label, record }
    }
}

/// 진단 콘솔 미러
///
/// `verbose_logging`이 켜진 경우에만 방출을 `pagemon::mirror` 타깃으로 남긴다.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMirror {
    enabled: bool,
}

impl DiagnosticMirror {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 방출 미러링
    pub fn emission(&self, label: &str, record: &MetricRecord) {
        if !self.enabled {
            return;
        }
        let payload = serde_json::to_string(record).unwrap_or_else(|e| format!("<{e}>"));
        info!(target: "pagemon::mirror", "[Per] {} {}", label, payload);
    }

    /// 일반 메시지 미러링
    pub fn message(&self, message: &str) {
        if self.enabled {
            info!(target: "pagemon::mirror", "[Per] {}", message);
        }
    }
}

/// 디스패처
pub struct Dispatcher {
    store: AggregationStore,
    sink: Option<Arc<dyn MetricSink>>,
    mirror: DiagnosticMirror,
}

impl Dispatcher {
    /// 새 디스패처 생성. 싱크가 없으면 병합과 진단만 수행한다.
    pub fn new(sink: Option<Arc<dyn MetricSink>>, mirror: DiagnosticMirror) -> Self {
        Self {
            store: AggregationStore::new(),
            sink,
            mirror,
        }
    }

    /// 방출 처리
    ///
    /// 측정 전용이면 `Ok(None)`. 그 외에는 병합된 지표 종류를 반환한다.
    /// 테이블에 없는 레이블은 아무것도 병합하지 않고 `UnknownLabel`.
    pub fn dispatch(
        &self,
        label: &str,
        record: MetricRecord,
        measure_only: bool,
    ) -> Result<Option<MetricKind>, CoreError> {
        self.mirror.emission(label, &record);

        if measure_only {
            debug!("측정 전용 방출: {}", label);
            return Ok(None);
        }

        let kind =
            kind_for_label(label).ok_or_else(|| CoreError::UnknownLabel(label.to_string()))?;
        let snapshot = self.store.merge(kind, record.clone());
        debug!("지표 병합: {} ({})", kind, label);

        if let Some(sink) = &self.sink {
            sink.on_metric(kind, &record, &snapshot);
        }

        Ok(Some(kind))
    }

    /// 정규화 방출 처리 (측정 전용 아님)
    pub fn emit(&self, emission: Emission) -> Result<Option<MetricKind>, CoreError> {
        self.dispatch(emission.label, emission.record, false)
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.store.snapshot()
    }

    pub fn store(&self) -> &AggregationStore {
        &self.store
    }

    pub fn mirror(&self) -> DiagnosticMirror {
        self.mirror
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store", &self.store)
            .field("has_sink", &self.sink.is_some())
            .field("mirror", &self.mirror)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pagemon_core::models::record::{TimingRecord, ValueRecord};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CaptureSink {
        calls: Mutex<Vec<(MetricKind, MetricRecord, AggregateSnapshot)>>,
    }

    impl MetricSink for CaptureSink {
        fn on_metric(&self, kind: MetricKind, record: &MetricRecord, snapshot: &AggregateSnapshot) {
            self.calls
                .lock()
                .push((kind, record.clone(), snapshot.clone()));
        }
    }

    fn timing(time: f64) -> MetricRecord {
        MetricRecord::Timing(TimingRecord { time, score: None })
    }

    #[test]
    fn label_table_is_closed() {
        assert_eq!(kind_for_label("LCP Update"), Some(MetricKind::Lcp));
        assert_eq!(kind_for_label("LCP Final"), Some(MetricKind::Lcp));
        assert_eq!(kind_for_label("Navigation Time"), Some(MetricKind::NavigationTime));
        assert_eq!(kind_for_label("lcp"), None);
        assert_eq!(kind_for_label("pagemon-checkout"), None);
    }

    #[test]
    fn every_kind_has_a_label() {
        for kind in MetricKind::ALL {
            assert!(LABEL_TABLE.iter().any(|(_, k)| *k == kind), "{kind}");
        }
    }

    #[test]
    fn sink_sees_snapshot_after_merge() {
        let sink = Arc::new(CaptureSink::default());
        let dispatcher = Dispatcher::new(
            Some(sink.clone() as Arc<dyn MetricSink>),
            DiagnosticMirror::new(false),
        );

        dispatcher.dispatch(labels::FP, timing(12.0), false).unwrap();
        dispatcher
            .dispatch(labels::TTI, MetricRecord::Value(ValueRecord { value: 900.0 }), false)
            .unwrap();

        let calls = sink.calls.lock();
        assert_eq!(calls.len(), 2);
        let (kind, record, snapshot) = &calls[1];
        assert_eq!(*kind, MetricKind::Tti);
        assert_eq!(record.primary_value(), Some(900.0));
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(MetricKind::Fp));
    }

    #[test]
    fn measure_only_skips_store_and_sink() {
        let sink = Arc::new(CaptureSink::default());
        let dispatcher = Dispatcher::new(
            Some(sink.clone() as Arc<dyn MetricSink>),
            DiagnosticMirror::new(true),
        );

        let result = dispatcher.dispatch("pagemon-checkout", timing(42.0), true);

        assert_matches!(result, Ok(None));
        assert!(sink.calls.lock().is_empty());
        assert!(dispatcher.snapshot().is_empty());
    }

    #[test]
    fn unknown_label_is_rejected() {
        let dispatcher = Dispatcher::new(None, DiagnosticMirror::new(false));
        let result = dispatcher.dispatch("LCP End", timing(1.0), false);

        assert_matches!(result, Err(CoreError::UnknownLabel(ref l)) if l == "LCP End");
        assert!(dispatcher.snapshot().is_empty());
    }

    #[test]
    fn no_sink_still_merges() {
        let dispatcher = Dispatcher::new(None, DiagnosticMirror::new(false));
        let kind = dispatcher.emit(Emission::new(labels::FCP, timing(800.0))).unwrap();

        assert_eq!(kind, Some(MetricKind::Fcp));
        assert!(!dispatcher.has_sink());
        assert!(dispatcher.snapshot().contains(MetricKind::Fcp));
    }
}
