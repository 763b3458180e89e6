//! # pagemon-core
//!
//! PAGEMON 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 엔진과 호스트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 지표 종류, 점수 등급, 지표 레코드, 브라우저 원시 엔트리 (serde)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (싱크, 관측 소스, 타임라인)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 모니터링 세션 설정 구조체
//! - [`config_manager`]: 설정 파일 로드, 기본 설정 파일 생성

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::metric::{MetricKind, ScoreBand};
    use crate::models::record::{MetricRecord, TimingRecord};

    #[test]
    fn metric_kind_serializes_camel_case() {
        let json = serde_json::to_string(&MetricKind::NavigationTime).unwrap();
        assert_eq!(json, "\"navigationTime\"");

        let kind: MetricKind = serde_json::from_str("\"networkInfo\"").unwrap();
        assert_eq!(kind, MetricKind::NetworkInfo);
    }

    #[test]
    fn score_band_ordering() {
        assert!(ScoreBand::Good < ScoreBand::NeedsImprovement);
        assert!(ScoreBand::NeedsImprovement < ScoreBand::Poor);
    }

    #[test]
    fn timing_record_json_shape() {
        let record = MetricRecord::Timing(TimingRecord {
            time: 1200.0,
            score: Some(ScoreBand::Good),
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["time"], 1200.0);
        assert_eq!(value["score"], "good");
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::MonitorConfig::default();
        assert!(!config.verbose_logging);
        assert_eq!(config.long_task_log_capacity, 256);
        assert_eq!(config.blocking_threshold_ms, 50.0);
        assert_eq!(config.measure_prefix, "pagemon");
    }
}
