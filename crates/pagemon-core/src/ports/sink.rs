//! 지표 싱크 포트.
//!
//! 구현: 호스트 애플리케이션 (`pagemon-replay`의 JSON Lines 싱크 등)

use crate::models::metric::MetricKind;
use crate::models::record::MetricRecord;
use crate::models::snapshot::AggregateSnapshot;

/// 외부 지표 싱크
///
/// 세션 시작 시 한 번 설정된다. 관측 콜백 안에서 동기 호출되므로
/// 구현은 블로킹 작업을 피해야 한다.
pub trait MetricSink: Send + Sync {
    /// 병합 직후의 (종류, 레코드, 전체 스냅샷) 전달
    fn on_metric(&self, kind: MetricKind, record: &MetricRecord, snapshot: &AggregateSnapshot);
}

impl<F> MetricSink for F
where
    F: Fn(MetricKind, &MetricRecord, &AggregateSnapshot) + Send + Sync,
{
    fn on_metric(&self, kind: MetricKind, record: &MetricRecord, snapshot: &AggregateSnapshot) {
        self(kind, record, snapshot)
    }
}
