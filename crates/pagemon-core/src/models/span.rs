//! 수동 구간 측정(User Timing) 모델.

use serde::{Deserialize, Serialize};

/// 타임라인 엔트리 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineEntryType {
    Mark,
    Measure,
}

/// 마크 또는 측정 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub name: String,
    pub entry_type: TimelineEntryType,
    /// 기록 시각 (타임라인 원점 기준 ms)
    pub start_time: f64,
    /// 마크는 항상 0
    pub duration: f64,
}
