//! 지표 종류와 점수 등급.

use serde::{Deserialize, Serialize};

/// 정규화된 지표 종류 (닫힌 집합, 런타임 확장 없음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// 내비게이션 타이밍 (리다이렉트, DNS, TCP, TTFB 등)
    NavigationTime,
    /// 네트워크 연결 정보
    NetworkInfo,
    /// First Contentful Paint
    Fcp,
    /// First Paint
    Fp,
    /// Largest Contentful Paint
    Lcp,
    /// Cumulative Layout Shift
    Cls,
    /// First Input Delay
    Fid,
    /// Total Blocking Time
    Tbt,
    /// Time to Interactive
    Tti,
    /// First Meaningful Paint (수동 구간 측정)
    Fmp,
}

impl MetricKind {
    /// 모든 지표 종류
    pub const ALL: [MetricKind; 10] = [
        MetricKind::NavigationTime,
        MetricKind::NetworkInfo,
        MetricKind::Fcp,
        MetricKind::Fp,
        MetricKind::Lcp,
        MetricKind::Cls,
        MetricKind::Fid,
        MetricKind::Tbt,
        MetricKind::Tti,
        MetricKind::Fmp,
    ];

    /// 직렬화 형식과 동일한 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::NavigationTime => "navigationTime",
            MetricKind::NetworkInfo => "networkInfo",
            MetricKind::Fcp => "fcp",
            MetricKind::Fp => "fp",
            MetricKind::Lcp => "lcp",
            MetricKind::Cls => "cls",
            MetricKind::Fid => "fid",
            MetricKind::Tbt => "tbt",
            MetricKind::Tti => "tti",
            MetricKind::Fmp => "fmp",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 품질 등급 (Good < NeedsImprovement < Poor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Good,
    NeedsImprovement,
    Poor,
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::NeedsImprovement => write!(f, "needsImprovement"),
            ScoreBand::Poor => write!(f, "poor"),
        }
    }
}
