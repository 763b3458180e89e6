//! 집계 저장소.
//!
//! 지표 종류별 최신 레코드를 보관한다. 같은 종류의 나중 레코드가
//! 항상 이전 레코드를 대체한다 (last-write-wins, 충돌 감지 없음).

use pagemon_core::models::metric::MetricKind;
use pagemon_core::models::record::MetricRecord;
use pagemon_core::models::snapshot::AggregateSnapshot;
use parking_lot::RwLock;

/// 종류 → 최신 레코드 저장소
#[derive(Debug, Default)]
pub struct AggregationStore {
    snapshot: RwLock<AggregateSnapshot>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 병합 후 병합 직후의 전체 스냅샷 반환
    pub fn merge(&self, kind: MetricKind, record: MetricRecord) -> AggregateSnapshot {
        let mut snapshot = self.snapshot.write();
        snapshot.insert(kind, record);
        snapshot.clone()
    }

    /// 현재 스냅샷 복제본
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.snapshot.read().clone()
    }

    /// 단일 종류 조회
    pub fn get(&self, kind: MetricKind) -> Option<MetricRecord> {
        self.snapshot.read().get(kind).cloned()
    }
}
