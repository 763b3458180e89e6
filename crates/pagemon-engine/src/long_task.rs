//! 롱 태스크 누적기 (Total Blocking Time).
//!
//! 기준 시각(FCP) 이후 현재 창에서 발생한 롱 태스크마다
//! `duration - 50ms` 초과분을 블로킹 시간 합계에 더한다.
//! 세션이 끝날 때까지 무한히 들어오는 스트림을 합계 스칼라 하나로 처리한다.

use pagemon_core::models::entry::{LongTaskEntry, SELF_ATTRIBUTION};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// 롱 태스크 한 건의 처리 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongTaskOutcome {
    /// 자식 프레임 등 다른 귀속 태그: 무시
    Foreign,
    /// 기준 시각 이전에 시작: 무시
    BeforeReference,
    /// 수락했으나 임계값 이하
    NonBlocking,
    /// 수락, 초과분을 합계에 더함
    Blocking(f64),
}

impl LongTaskOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LongTaskOutcome::NonBlocking | LongTaskOutcome::Blocking(_))
    }
}

/// 블로킹 시간 누적기
///
/// 합계는 단조 비감소. 조회는 초기화하지 않는다.
#[derive(Debug)]
pub struct LongTaskAccumulator {
    /// 블로킹 합계 (f64 비트)
    total: AtomicU64,
    /// 태스크당 블로킹 기준 (ms)
    threshold_ms: f64,
    /// 수락된 원시 엔트리 진단 목록 (최근 N개)
    log: Mutex<VecDeque<LongTaskEntry>>,
    log_capacity: usize,
}

impl LongTaskAccumulator {
    /// 새 누적기 생성
    pub fn new(threshold_ms: f64, log_capacity: usize) -> Self {
        Self {
            total: AtomicU64::new(0f64.to_bits()),
            threshold_ms,
            log: Mutex::new(VecDeque::with_capacity(log_capacity.min(64))),
            log_capacity,
        }
    }

    /// 롱 태스크 한 건 처리
    pub fn on_long_task(&self, entry: &LongTaskEntry, fcp_time: f64) -> LongTaskOutcome {
        if entry.name != SELF_ATTRIBUTION {
            return LongTaskOutcome::Foreign;
        }
        if entry.start_time < fcp_time {
            return LongTaskOutcome::BeforeReference;
        }

        self.record(entry);

        let excess = entry.duration - self.threshold_ms;
        if excess > 0.0 {
            self.add(excess);
            trace!(
                "롱 태스크 블로킹 +{:.1}ms (start={}, duration={})",
                excess,
                entry.start_time,
                entry.duration
            );
            LongTaskOutcome::Blocking(excess)
        } else {
            LongTaskOutcome::NonBlocking
        }
    }

    /// 현재 블로킹 합계
    pub fn total(&self) -> f64 {
        f64::from_bits(self.total.load(Ordering::Acquire))
    }

    /// 진단 목록 복제본 (오래된 순)
    pub fn log(&self) -> Vec<LongTaskEntry> {
        self.log.lock().iter().cloned().collect()
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    fn add(&self, excess: f64) {
        // 클로저가 항상 Some을 반환하므로 실패하지 않는다
        let _ = self
            .total
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + excess).to_bits())
            });
    }

    fn record(&self, entry: &LongTaskEntry) {
        if self.log_capacity == 0 {
            return;
        }
        let mut log = self.log.lock();
        if log.len() == self.log_capacity {
            log.pop_front();
        }
        log.push_back(entry.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, start_time: f64, duration: f64) -> LongTaskEntry {
        LongTaskEntry {
            name: name.to_string(),
            start_time,
            duration,
        }
    }

    #[test]
    fn only_self_tasks_after_reference_count() {
        let acc = LongTaskAccumulator::new(50.0, 16);

        assert_eq!(
            acc.on_long_task(&task("self", 10.0, 80.0), 5.0),
            LongTaskOutcome::Blocking(30.0)
        );
        assert_eq!(
            acc.on_long_task(&task("other", 20.0, 200.0), 5.0),
            LongTaskOutcome::Foreign
        );
        assert_eq!(acc.total(), 30.0);
    }

    #[test]
    fn tasks_before_reference_are_ignored() {
        let acc = LongTaskAccumulator::new(50.0, 16);
        assert_eq!(
            acc.on_long_task(&task("self", 4.9, 500.0), 5.0),
            LongTaskOutcome::BeforeReference
        );
        assert_eq!(acc.total(), 0.0);
        assert!(acc.log().is_empty());
    }

    #[test]
    fn short_tasks_do_not_block() {
        let acc = LongTaskAccumulator::new(50.0, 16);
        let outcome = acc.on_long_task(&task("self", 100.0, 50.0), 0.0);

        assert_eq!(outcome, LongTaskOutcome::NonBlocking);
        assert!(outcome.is_accepted());
        assert_eq!(acc.total(), 0.0);
        // 수락된 엔트리는 진단 목록에 남는다
        assert_eq!(acc.log().len(), 1);
    }

    #[test]
    fn total_is_monotonic() {
        let acc = LongTaskAccumulator::new(50.0, 0);
        let mut last = 0.0;
        for (i, duration) in [10.0, 70.0, 51.0, 30.0, 250.0, 50.0].into_iter().enumerate() {
            acc.on_long_task(&task("self", i as f64 * 100.0, duration), 0.0);
            assert!(acc.total() >= last);
            last = acc.total();
        }
        assert_eq!(acc.total(), 20.0 + 1.0 + 200.0);
        assert!(acc.log().is_empty());
    }

    #[test]
    fn log_keeps_most_recent() {
        let acc = LongTaskAccumulator::new(50.0, 2);
        for start in [1.0, 2.0, 3.0] {
            acc.on_long_task(&task("self", start, 60.0), 0.0);
        }
        let starts: Vec<f64> = acc.log().iter().map(|e| e.start_time).collect();
        assert_eq!(starts, vec![2.0, 3.0]);
    }
}
