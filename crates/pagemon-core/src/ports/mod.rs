//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 엔진은 이 trait들만 알고, 호스트(브라우저 바인딩, 리플레이 등)가 구현한다.
//! 와이어링은 `Arc<dyn T>`로 한다.

pub mod sink;
pub mod source;
pub mod timeline;
