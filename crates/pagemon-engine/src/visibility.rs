//! 가시성 게이트.
//!
//! 페이지가 처음으로 백그라운드로 전환된 시각을 보관한다.
//! 이 시각 이후에 시작된 first-input / largest-contentful-paint 엔트리는 버린다.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// 숨김 시각 게이트 (f64 비트를 AtomicU64에 저장, atomic min으로만 갱신)
#[derive(Debug)]
pub struct VisibilityGate {
    hidden_time: AtomicU64,
}

impl VisibilityGate {
    /// 새 게이트 생성
    ///
    /// 백그라운드에서 시작한 페이지는 0, 그 외에는 +∞ (게이트 열림).
    pub fn new(initially_hidden: bool) -> Self {
        let initial = if initially_hidden { 0.0 } else { f64::INFINITY };
        Self {
            hidden_time: AtomicU64::new(initial.to_bits()),
        }
    }

    /// 현재 숨김 시각
    pub fn hidden_time(&self) -> f64 {
        f64::from_bits(self.hidden_time.load(Ordering::Acquire))
    }

    /// 숨김 전환 기록: `hidden_time = min(hidden_time, timestamp)`
    ///
    /// 갱신 후 숨김 시각을 반환한다. NaN은 무시된다.
    pub fn on_hidden(&self, timestamp: f64) -> f64 {
        let previous = self
            .hidden_time
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let current = f64::from_bits(bits);
                let next = current.min(timestamp);
                (next != current).then(|| next.to_bits())
            });

        match previous {
            Ok(bits) => {
                let updated = f64::from_bits(bits).min(timestamp);
                debug!("페이지 숨김 전환: hidden_time={}", updated);
                updated
            }
            Err(bits) => f64::from_bits(bits),
        }
    }

    /// 엔트리 통과 여부 (`start_time < hidden_time`)
    pub fn admits(&self, start_time: f64) -> bool {
        start_time < self.hidden_time()
    }

    /// 한 번이라도 숨김 상태였는지
    pub fn has_been_hidden(&self) -> bool {
        self.hidden_time().is_finite()
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(false)
    }
}
