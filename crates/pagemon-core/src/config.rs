//! 모니터링 세션 설정 구조체.
//!
//! 진단 로그 미러, 롱 태스크 진단 목록 용량, 블로킹 임계값, 측정 이름 접두사.
//! JSON 파일에서 로드하며 누락 필드는 기본값으로 채운다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 세션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 진단 콘솔 미러 활성화. 싱크 호출과 점수 계산에는 영향 없음.
    #[serde(default)]
    pub verbose_logging: bool,
    /// 롱 태스크 진단 목록 최대 길이 (0이면 기록 안 함)
    #[serde(default = "default_long_task_log_capacity")]
    pub long_task_log_capacity: usize,
    /// 태스크 하나가 블로킹으로 간주되는 기준 (ms)
    #[serde(default = "default_blocking_threshold_ms")]
    pub blocking_threshold_ms: f64,
    /// 수동 측정 이름 접두사 (`{prefix}-{start}`)
    #[serde(default = "default_measure_prefix")]
    pub measure_prefix: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            long_task_log_capacity: default_long_task_log_capacity(),
            blocking_threshold_ms: default_blocking_threshold_ms(),
            measure_prefix: default_measure_prefix(),
        }
    }
}

impl MonitorConfig {
    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.blocking_threshold_ms.is_finite() || self.blocking_threshold_ms < 0.0 {
            return Err(CoreError::Config(format!(
                "blocking_threshold_ms는 0 이상의 유한값이어야 합니다: {}",
                self.blocking_threshold_ms
            )));
        }
        if self.measure_prefix.trim().is_empty() {
            return Err(CoreError::Config(
                "measure_prefix가 비어 있습니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 수동 측정 이름
    pub fn measure_name(&self, start_name: &str) -> String {
        format!("{}-{}", self.measure_prefix, start_name)
    }
}

fn default_long_task_log_capacity() -> usize {
    256
}

fn default_blocking_threshold_ms() -> f64 {
    50.0
}

fn default_measure_prefix() -> String {
    "pagemon".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: MonitorConfig = serde_json::from_str(r#"{"verbose_logging":true}"#).unwrap();
        assert!(config.verbose_logging);
        assert_eq!(config.long_task_log_capacity, 256);
        assert_eq!(config.blocking_threshold_ms, 50.0);
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let config = MonitorConfig {
            blocking_threshold_ms: -1.0,
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn validate_rejects_blank_prefix() {
        let config = MonitorConfig {
            measure_prefix: "  ".to_string(),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn measure_name_uses_prefix() {
        let config = MonitorConfig::default();
        assert_eq!(config.measure_name("checkout"), "pagemon-checkout");
    }
}
