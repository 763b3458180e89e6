//! 성능 타임라인 포트 (mark / measure).
//!
//! 구현: `pagemon-engine::timeline::InMemoryTimeline`

use crate::error::CoreError;
use crate::models::span::TimelineEntry;

/// User Timing 버퍼
pub trait PerformanceTimeline: Send + Sync {
    /// 현재 시각에 마크 기록
    fn mark(&self, name: &str) -> Result<TimelineEntry, CoreError>;

    /// 두 마크 사이 구간을 `name`으로 측정. 마크가 없으면 `MarkNotFound`.
    fn measure(&self, name: &str, start_mark: &str, end_mark: &str)
        -> Result<TimelineEntry, CoreError>;

    /// 이름으로 마크/측정 엔트리 조회 (기록 순)
    fn entries_by_name(&self, name: &str) -> Vec<TimelineEntry>;

    /// 마크 제거. `None`이면 전체.
    fn clear_marks(&self, name: Option<&str>);

    /// 측정 제거. `None`이면 전체.
    fn clear_measures(&self, name: Option<&str>);
}
