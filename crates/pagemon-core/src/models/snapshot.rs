//! 집계 스냅샷.
//!
//! 지표 종류별 최신 레코드. 일부 종류만 존재할 수 있다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metric::MetricKind;
use super::record::MetricRecord;

/// 종류 → 최신 레코드 매핑 (종류로만 조회, 삽입 순서 무관)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateSnapshot {
    records: BTreeMap<MetricKind, MetricRecord>,
}

impl AggregateSnapshot {
    /// 빈 스냅샷
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 덮어쓰기 (last-write-wins). 이전 레코드를 반환한다.
    pub fn insert(&mut self, kind: MetricKind, record: MetricRecord) -> Option<MetricRecord> {
        self.records.insert(kind, record)
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricRecord> {
        self.records.get(&kind)
    }

    pub fn contains(&self, kind: MetricKind) -> bool {
        self.records.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricKind, &MetricRecord)> {
        self.records.iter()
    }
}
