//! 인메모리 성능 타임라인.
//!
//! `PerformanceTimeline` 포트 구현. 마크/측정을 메모리에 보관한다.

use pagemon_core::error::CoreError;
use pagemon_core::models::span::{TimelineEntry, TimelineEntryType};
use pagemon_core::ports::timeline::PerformanceTimeline;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// 타임라인 원점 기준 현재 시각 (ms)
pub type Clock = Arc<dyn Fn() -> f64 + Send + Sync>;

#[derive(Default)]
struct Buffers {
    marks: Vec<TimelineEntry>,
    measures: Vec<TimelineEntry>,
}

/// 인메모리 User Timing 버퍼
pub struct InMemoryTimeline {
    clock: Clock,
    buffers: Mutex<Buffers>,
}

impl InMemoryTimeline {
    /// 단조 시계(`Instant`) 기반 타임라인
    pub fn new() -> Self {
        let origin = Instant::now();
        Self::with_clock(Arc::new(move || origin.elapsed().as_secs_f64() * 1000.0))
    }

    /// 외부 시계 주입 (테스트, 리플레이)
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            buffers: Mutex::new(Buffers::default()),
        }
    }

    fn latest_mark(buffers: &Buffers, name: &str) -> Result<f64, CoreError> {
        buffers
            .marks
            .iter()
            .rev()
            .find(|m| m.name == name)
            .map(|m| m.start_time)
            .ok_or_else(|| CoreError::MarkNotFound(name.to_string()))
    }
}

impl Default for InMemoryTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceTimeline for InMemoryTimeline {
    fn mark(&self, name: &str) -> Result<TimelineEntry, CoreError> {
        let entry = TimelineEntry {
            name: name.to_string(),
            entry_type: TimelineEntryType::Mark,
            start_time: (self.clock)(),
            duration: 0.0,
        };
        self.buffers.lock().marks.push(entry.clone());
        Ok(entry)
    }

    fn measure(
        &self,
        name: &str,
        start_mark: &str,
        end_mark: &str,
    ) -> Result<TimelineEntry, CoreError> {
        let mut buffers = self.buffers.lock();
        let start = Self::latest_mark(&buffers, start_mark)?;
        let end = Self::latest_mark(&buffers, end_mark)?;

        let entry = TimelineEntry {
            name: name.to_string(),
            entry_type: TimelineEntryType::Measure,
            start_time: start,
            duration: end - start,
        };
        buffers.measures.push(entry.clone());
        Ok(entry)
    }

    fn entries_by_name(&self, name: &str) -> Vec<TimelineEntry> {
        let buffers = self.buffers.lock();
        let mut entries: Vec<TimelineEntry> = buffers
            .marks
            .iter()
            .chain(buffers.measures.iter())
            .filter(|e| e.name == name)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        entries
    }

    fn clear_marks(&self, name: Option<&str>) {
        let mut buffers = self.buffers.lock();
        match name {
            Some(name) => buffers.marks.retain(|m| m.name != name),
            None => buffers.marks.clear(),
        }
    }

    fn clear_measures(&self, name: Option<&str>) {
        let mut buffers = self.buffers.lock();
        match name {
            Some(name) => buffers.measures.retain(|m| m.name != name),
            None => buffers.measures.clear(),
        }
    }
}
