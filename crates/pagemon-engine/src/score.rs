//! 점수 분류기.
//!
//! (지표 종류, 수치) → 3단계 품질 등급.
//! 임계값 테이블이 있는 종류만 [`ScoredKind`]로 표현되므로
//! 점수 대상이 아닌 종류(navigationTime, networkInfo, fp, tti, fmp)는
//! 분류 함수에 넘길 수 없다.

use pagemon_core::models::metric::{MetricKind, ScoreBand};

/// 점수 대상 지표 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoredKind {
    Fcp,
    Lcp,
    Fid,
    Tbt,
    Cls,
}

/// 오름차순 구간 경계 `[good, needs_improvement]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// 이 값 이하면 Good
    pub good: f64,
    /// 이 값 이하면 NeedsImprovement, 초과하면 Poor
    pub needs_improvement: f64,
}

impl ScoredKind {
    pub const ALL: [ScoredKind; 5] = [
        ScoredKind::Fcp,
        ScoredKind::Lcp,
        ScoredKind::Fid,
        ScoredKind::Tbt,
        ScoredKind::Cls,
    ];

    /// 임계값 테이블 (CLS는 단위 없는 시프트 점수, 나머지는 ms)
    pub const fn thresholds(self) -> Thresholds {
        match self {
            ScoredKind::Fcp => Thresholds {
                good: 2000.0,
                needs_improvement: 4000.0,
            },
            ScoredKind::Lcp => Thresholds {
                good: 2500.0,
                needs_improvement: 4000.0,
            },
            ScoredKind::Fid => Thresholds {
                good: 100.0,
                needs_improvement: 300.0,
            },
            ScoredKind::Tbt => Thresholds {
                good: 300.0,
                needs_improvement: 600.0,
            },
            ScoredKind::Cls => Thresholds {
                good: 0.1,
                needs_improvement: 0.25,
            },
        }
    }

    /// 수치 분류. 경계값은 아래 등급에 포함된다.
    pub fn classify(self, value: f64) -> ScoreBand {
        let t = self.thresholds();
        if value <= t.good {
            ScoreBand::Good
        } else if value <= t.needs_improvement {
            ScoreBand::NeedsImprovement
        } else {
            ScoreBand::Poor
        }
    }

    /// 대응하는 지표 종류
    pub const fn metric_kind(self) -> MetricKind {
        match self {
            ScoredKind::Fcp => MetricKind::Fcp,
            ScoredKind::Lcp => MetricKind::Lcp,
            ScoredKind::Fid => MetricKind::Fid,
            ScoredKind::Tbt => MetricKind::Tbt,
            ScoredKind::Cls => MetricKind::Cls,
        }
    }

    /// 점수 대상이면 Some
    pub const fn from_metric_kind(kind: MetricKind) -> Option<ScoredKind> {
        match kind {
            MetricKind::Fcp => Some(ScoredKind::Fcp),
            MetricKind::Lcp => Some(ScoredKind::Lcp),
            MetricKind::Fid => Some(ScoredKind::Fid),
            MetricKind::Tbt => Some(ScoredKind::Tbt),
            MetricKind::Cls => Some(ScoredKind::Cls),
            MetricKind::NavigationTime
            | MetricKind::NetworkInfo
            | MetricKind::Fp
            | MetricKind::Tti
            | MetricKind::Fmp => None,
        }
    }
}

impl From<ScoredKind> for MetricKind {
    fn from(kind: ScoredKind) -> Self {
        kind.metric_kind()
    }
}

/// `ScoredKind::classify` 축약
pub fn classify(kind: ScoredKind, value: f64) -> ScoreBand {
    kind.classify(value)
}
