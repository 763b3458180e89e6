//! 지표 정규화기.
//!
//! 관측 유형별 원시 필드를 정규화 레코드로 변환한다.
//! 공유 가변 입력은 숨김 시각과 블로킹 합계 두 가지뿐이며,
//! 나머지 규칙은 모두 순수 함수다.

use pagemon_core::models::entry::{
    ConnectionInfo, FirstInputEntry, LargestContentfulPaintEntry, NavigationTimingEntry,
    PaintEntry, PerformanceEntry, FIRST_CONTENTFUL_PAINT,
};
use pagemon_core::models::record::{
    ContentfulPaintRecord, MetricRecord, NavigationTimingRecord, NetworkInfoRecord,
    RedirectTiming, ShiftRecord, TimingRecord, ValueRecord,
};
use tracing::debug;

use crate::dispatch::{labels, Emission};
use crate::score::ScoredKind;
use crate::visibility::VisibilityGate;

/// 내비게이션 타이밍 → 단일 레코드. 엔트리가 없으면 빈 레코드.
pub fn navigation_timing(entry: Option<&NavigationTimingEntry>) -> Emission {
    let Some(t) = entry else {
        return Emission::new(labels::NAVIGATION_TIME, MetricRecord::unavailable());
    };

    let head_size = t.transfer_size - t.encoded_body_size;
    let record = NavigationTimingRecord {
        redirect: RedirectTiming {
            count: t.redirect_count,
            time: t.redirect_end - t.redirect_start,
        },
        app_cache: t.domain_lookup_start - t.fetch_start,
        dns_time: t.domain_lookup_end - t.domain_lookup_start,
        tcp: t.connect_end - t.connect_start,
        head_size: if head_size.is_nan() { 0.0 } else { head_size },
        response_time: t.response_end - t.response_start,
        ttfb: t.response_start - t.request_start,
        fetch_time: t.response_end - t.fetch_start,
        worker_time: if t.worker_start > 0.0 {
            t.response_end - t.worker_start
        } else {
            0.0
        },
        dom_ready: t.dom_content_loaded_event_end - t.fetch_start,
        dcl: t.dom_content_loaded_event_end - t.dom_content_loaded_event_start,
    };

    Emission::new(labels::NAVIGATION_TIME, MetricRecord::Navigation(record))
}

/// 네트워크 정보 → 단일 레코드. 플랫폼이 노출하지 않으면 빈 레코드.
pub fn network_info(info: Option<&ConnectionInfo>) -> Emission {
    let record = match info {
        Some(c) => MetricRecord::Network(NetworkInfoRecord {
            effective_type: c.effective_type.clone(),
            downlink: c.downlink,
            rtt: c.rtt,
            save_data: c.save_data,
        }),
        None => MetricRecord::unavailable(),
    };
    Emission::new(labels::NETWORK_INFO, record)
}

/// 페인트 엔트리 정규화 결과
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOutcome {
    pub emission: Emission,
    /// FCP인 경우 롱 태스크 누적 기준 시각
    pub fcp_time: Option<f64>,
}

/// 페인트 엔트리 → FCP(점수 포함) 또는 FP
pub fn paint(entry: &PaintEntry) -> PaintOutcome {
    let time = entry.start_time;
    if entry.name == FIRST_CONTENTFUL_PAINT {
        PaintOutcome {
            emission: Emission::new(
                labels::FCP,
                MetricRecord::Timing(TimingRecord {
                    time,
                    score: Some(ScoredKind::Fcp.classify(time)),
                }),
            ),
            fcp_time: Some(time),
        }
    } else {
        PaintOutcome {
            emission: Emission::new(
                labels::FP,
                MetricRecord::Timing(TimingRecord { time, score: None }),
            ),
            fcp_time: None,
        }
    }
}

/// 첫 입력 → FID + 그 시점의 TBT. 숨김 이후 엔트리는 빈 목록.
pub fn first_input(
    entry: &FirstInputEntry,
    gate: &VisibilityGate,
    blocking_total: f64,
) -> Vec<Emission> {
    if !gate.admits(entry.start_time) {
        debug!(
            "숨김 이후 first-input 무시: start={} hidden={}",
            entry.start_time,
            gate.hidden_time()
        );
        return Vec::new();
    }

    let delay = entry.processing_start - entry.start_time;
    vec![
        Emission::new(
            labels::FID,
            MetricRecord::Timing(TimingRecord {
                time: delay,
                score: Some(ScoredKind::Fid.classify(delay)),
            }),
        ),
        Emission::new(
            labels::TBT,
            MetricRecord::Timing(TimingRecord {
                time: blocking_total,
                score: Some(ScoredKind::Tbt.classify(blocking_total)),
            }),
        ),
    ]
}

/// LCP 2단계 방출 추적기
///
/// 통과한 엔트리마다 중간값("LCP Update")을 방출하고,
/// 스트림 종료 시 마지막 통과 엔트리로 최종값("LCP Final")을 한 번 방출한다.
#[derive(Debug, Default)]
pub struct LcpTracker {
    last: Option<LargestContentfulPaintEntry>,
    finalized: bool,
}

impl LcpTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 엔트리 하나 처리. 숨김 이후이거나 이미 확정된 경우 None.
    pub fn observe(
        &mut self,
        entry: &LargestContentfulPaintEntry,
        gate: &VisibilityGate,
    ) -> Option<Emission> {
        if self.finalized {
            return None;
        }
        if !gate.admits(entry.start_time) {
            debug!(
                "숨김 이후 LCP 엔트리 무시: start={} hidden={}",
                entry.start_time,
                gate.hidden_time()
            );
            return None;
        }

        self.last = Some(entry.clone());
        Some(Emission::new(labels::LCP_UPDATE, contentful(entry, false)))
    }

    /// 최종값 방출. 통과한 엔트리가 없거나 이미 확정했으면 None.
    pub fn finalize(&mut self) -> Option<Emission> {
        if self.finalized {
            return None;
        }
        self.finalized = true;
        self.last
            .as_ref()
            .map(|entry| Emission::new(labels::LCP_FINAL, contentful(entry, true)))
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// 마지막으로 통과한 엔트리
    pub fn last_entry(&self) -> Option<&LargestContentfulPaintEntry> {
        self.last.as_ref()
    }
}

fn contentful(entry: &LargestContentfulPaintEntry, is_final: bool) -> MetricRecord {
    let time = entry.paint_time();
    MetricRecord::Contentful(ContentfulPaintRecord {
        time,
        size: entry.size,
        score: ScoredKind::Lcp.classify(time),
        is_final,
    })
}

/// 레이아웃 시프트 콜백 한 번 → CLS 레코드
///
/// 값은 이 콜백 안에서 최근 입력이 없던 시프트의 합이다 (세션 누적 아님).
/// 배치에 layout-shift 엔트리가 없으면 None.
pub fn layout_shift(entries: &[PerformanceEntry]) -> Option<Emission> {
    let mut seen = false;
    let mut value = 0.0;
    for entry in entries {
        if let PerformanceEntry::LayoutShift(shift) = entry {
            seen = true;
            if !shift.had_recent_input {
                value += shift.value;
            }
        }
    }

    seen.then(|| {
        Emission::new(
            labels::CLS_UPDATE,
            MetricRecord::Shift(ShiftRecord {
                value,
                score: ScoredKind::Cls.classify(value),
            }),
        )
    })
}

/// 상호작용 가능 시각 → TTI 레코드
pub fn interactivity(value: f64) -> Emission {
    Emission::new(labels::TTI, MetricRecord::Value(ValueRecord { value }))
}
