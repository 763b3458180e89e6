//! 정규화 지표 레코드.
//!
//! 외부 싱크로 전달되는 JSON 형태는 종류별 자유 형식(`{time, score}`,
//! `{value, score}` 등)이므로 `untagged`로 직렬화한다.
//! 역직렬화 시 필드가 많은 변형부터 매칭되도록 선언 순서를 유지할 것.

use serde::{Deserialize, Serialize};

use super::metric::ScoreBand;

/// 종류별 지표 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricRecord {
    /// 내비게이션 타이밍
    Navigation(NavigationTimingRecord),
    /// 네트워크 정보
    Network(NetworkInfoRecord),
    /// LCP 중간/최종 값
    Contentful(ContentfulPaintRecord),
    /// 단일 시간 값 (FCP, FP, FID, TBT, FMP)
    Timing(TimingRecord),
    /// 레이아웃 시프트 합계
    Shift(ShiftRecord),
    /// 단일 값 (TTI)
    Value(ValueRecord),
    /// 기능 부재. `{}`로 직렬화되며 에러가 아니다.
    Unavailable(Unavailable),
}

impl MetricRecord {
    /// 빈 레코드
    pub fn unavailable() -> Self {
        MetricRecord::Unavailable(Unavailable {})
    }

    /// 기능 부재 여부
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetricRecord::Unavailable(_))
    }

    /// 대표 수치 (`time` 또는 `value`)
    pub fn primary_value(&self) -> Option<f64> {
        match self {
            MetricRecord::Contentful(r) => Some(r.time),
            MetricRecord::Timing(r) => Some(r.time),
            MetricRecord::Shift(r) => Some(r.value),
            MetricRecord::Value(r) => Some(r.value),
            MetricRecord::Navigation(_) | MetricRecord::Network(_) | MetricRecord::Unavailable(_) => {
                None
            }
        }
    }

    /// 품질 등급 (점수 대상 종류만)
    pub fn score(&self) -> Option<ScoreBand> {
        match self {
            MetricRecord::Contentful(r) => Some(r.score),
            MetricRecord::Timing(r) => r.score,
            MetricRecord::Shift(r) => Some(r.score),
            _ => None,
        }
    }
}

/// 리다이렉트 횟수와 소요 시간
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectTiming {
    pub count: u32,
    pub time: f64,
}

/// 내비게이션 타이밍 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTimingRecord {
    pub redirect: RedirectTiming,
    /// domainLookupStart - fetchStart (앱 캐시 확인 시간)
    #[serde(rename = "appCache")]
    pub app_cache: f64,
    /// DNS 조회 시간
    #[serde(rename = "dnsTime")]
    pub dns_time: f64,
    /// TCP 핸드셰이크 시간
    #[serde(rename = "TCP")]
    pub tcp: f64,
    /// 응답 헤더 크기 (transferSize - encodedBodySize)
    #[serde(rename = "headSize")]
    pub head_size: f64,
    #[serde(rename = "responseTime")]
    pub response_time: f64,
    /// Time to First Byte
    #[serde(rename = "TTFB")]
    pub ttfb: f64,
    #[serde(rename = "fetchTime")]
    pub fetch_time: f64,
    /// Service Worker 응답 시간 (워커 미사용 시 0)
    #[serde(rename = "workerTime")]
    pub worker_time: f64,
    #[serde(rename = "domReady")]
    pub dom_ready: f64,
    /// DOMContentLoaded 핸들러 소요 시간
    #[serde(rename = "DCL")]
    pub dcl: f64,
}

/// 네트워크 정보 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfoRecord {
    pub effective_type: String,
    pub downlink: f64,
    pub rtt: f64,
    pub save_data: bool,
}

/// LCP 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentfulPaintRecord {
    pub time: f64,
    pub size: f64,
    pub score: ScoreBand,
    /// 스트림 종료 시 확정된 값인지 여부
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// 단일 시간 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBand>,
}

/// 레이아웃 시프트 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub value: f64,
    pub score: ScoreBand,
}

/// 단일 값 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub value: f64,
}

/// 빈 레코드 본문
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailable {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_serializes_as_empty_object() {
        let json = serde_json::to_string(&MetricRecord::unavailable()).unwrap();
        assert_eq!(json, "{}");

        let back: MetricRecord = serde_json::from_str("{}").unwrap();
        assert!(back.is_unavailable());
    }

    #[test]
    fn contentful_matches_before_timing() {
        let json = r#"{"time":2100.0,"size":5000.0,"score":"good","final":true}"#;
        let record: MetricRecord = serde_json::from_str(json).unwrap();

        assert!(matches!(record, MetricRecord::Contentful(ref r) if r.is_final));
        assert_eq!(record.primary_value(), Some(2100.0));
    }

    #[test]
    fn timing_without_score_omits_field() {
        let record = MetricRecord::Timing(TimingRecord {
            time: 300.0,
            score: None,
        });
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"time":300.0}"#);
        assert_eq!(record.score(), None);
    }
}
