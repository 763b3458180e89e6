//! 설정 파일 관리.
//!
//! 지정된 경로의 JSON 파일로 세션 설정을 로드하거나 기본 설정 파일을 만든다.

use crate::config::MonitorConfig;
use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 관리자
///
/// 한 번 로드한 설정과 그 출처 경로를 보관한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: MonitorConfig,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 기존 설정 파일 로드. 파일이 없으면 에러 (생성하지 않음).
    pub fn open(config_path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let config_path = config_path.into();
        let config = Self::load_from_file(&config_path)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// 기본 설정 파일 생성
    ///
    /// 상위 디렉토리가 없으면 만든다. 이미 파일이 있으면 덮어쓰지 않고 에러.
    pub fn create_default(config_path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let config_path = config_path.into();
        if config_path.exists() {
            return Err(CoreError::Config(format!(
                "설정 파일이 이미 존재합니다: {}",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let config = MonitorConfig::default();
        Self::save_to_file(&config_path, &config)?;
        info!("기본 설정 파일 생성: {}", config_path.display());

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn into_config(self) -> MonitorConfig {
        self.config
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn load_from_file(path: &Path) -> Result<MonitorConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: MonitorConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;
        config.validate()?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    fn save_to_file(path: &Path, config: &MonitorConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}
