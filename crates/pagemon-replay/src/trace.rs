//! 리플레이 트레이스 모델.
//!
//! 한 페이지 로드 동안 호스트가 관측한 내용을 JSON 한 파일로 기록한 것.
//! 이벤트는 기록된 순서대로 재생된다.

use pagemon_core::error::CoreError;
use pagemon_core::models::entry::{
    ConnectionInfo, NavigationTimingEntry, ObservationType, PerformanceEntry,
};
use pagemon_engine::InMemorySource;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 페이지 로드 트레이스
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    /// 관측 메커니즘 지원 여부
    #[serde(default = "default_supported")]
    pub supported: bool,
    #[serde(default)]
    pub initially_hidden: bool,
    #[serde(default)]
    pub navigation: Option<NavigationTimingEntry>,
    #[serde(default)]
    pub connection: Option<ConnectionInfo>,
    /// 없으면 TTI를 방출하지 않는다
    #[serde(default)]
    pub time_to_interactive: Option<f64>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

fn default_supported() -> bool {
    true
}

/// 트레이스 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceEvent {
    /// 관측 유형 하나의 엔트리 배치
    Observe {
        kind: ObservationType,
        entries: Vec<PerformanceEntry>,
    },
    /// 페이지 숨김 전환
    Hidden { timestamp: f64 },
    /// 관측 유형 구독 해제
    Unsubscribe { kind: ObservationType },
    MarkStart { name: String },
    MarkEnd { start: String, end: String },
    ClearMarks {
        #[serde(default)]
        name: Option<String>,
    },
    ClearMeasures {
        #[serde(default)]
        name: Option<String>,
    },
    FmpStart,
    FmpEnd,
}

impl Trace {
    /// JSON 문자열에서 파싱
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 파일에서 로드
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 트레이스 환경을 재현하는 인메모리 소스
    pub fn source(&self) -> InMemorySource {
        let mut source = if self.supported {
            InMemorySource::new()
        } else {
            InMemorySource::unsupported()
        };
        if self.initially_hidden {
            source = source.starting_hidden();
        }
        if let Some(navigation) = &self.navigation {
            source = source.with_navigation(navigation.clone());
        }
        if let Some(connection) = &self.connection {
            source = source.with_connection(connection.clone());
        }
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_trace_uses_defaults() {
        let trace = Trace::from_json("{}").unwrap();
        assert!(trace.supported);
        assert!(!trace.initially_hidden);
        assert!(trace.time_to_interactive.is_none());
        assert!(trace.events.is_empty());
    }

    #[test]
    fn events_are_externally_tagged() {
        let json = r#"{
            "events": [
                {"observe": {"kind": "paint", "entries": [
                    {"entryType": "paint", "name": "first-contentful-paint", "startTime": 812.5}
                ]}},
                {"hidden": {"timestamp": 900.0}},
                {"markEnd": {"start": "checkout", "end": "checkout-done"}},
                {"clearMeasures": {}},
                "fmpStart"
            ]
        }"#;
        let trace = Trace::from_json(json).unwrap();

        assert_eq!(trace.events.len(), 5);
        assert!(matches!(
            &trace.events[0],
            TraceEvent::Observe { kind: ObservationType::Paint, entries } if entries.len() == 1
        ));
        assert_eq!(trace.events[1], TraceEvent::Hidden { timestamp: 900.0 });
        assert_eq!(trace.events[3], TraceEvent::ClearMeasures { name: None });
        assert_eq!(trace.events[4], TraceEvent::FmpStart);
    }

    #[test]
    fn malformed_trace_is_serialization_error() {
        let result = Trace::from_json(r#"{"events": [{"teleport": {}}]}"#);
        assert!(matches!(result, Err(CoreError::Serialization(_))));
    }
}
