//! PAGEMON 핵심 에러 타입.
//!
//! 엔진은 잘 구성된 엔트리 스트림을 가정하므로 에러 종류는 적다.
//! 기능 부재(연결 정보 없음, 내비게이션 엔트리 없음 등)는 에러가 아니라
//! 빈 레코드로 표현한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 레이블 → 지표 종류 테이블에 없는 레이블
    #[error("알 수 없는 지표 레이블: {0}")]
    UnknownLabel(String),

    /// 측정 구간의 시작/종료 마크를 찾을 수 없음
    #[error("마크 미발견: {0}")]
    MarkNotFound(String),

    /// 호스트가 관측 메커니즘을 지원하지 않음
    #[error("지원되지 않는 환경: {0}")]
    Unsupported(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
