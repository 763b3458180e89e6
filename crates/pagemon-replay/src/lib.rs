//! # pagemon-replay
//!
//! 기록된 페이지 로드 트레이스를 모니터링 세션에 재생하는 호스트.
//! 인메모리 소스로 엔트리를 전달하고, 싱크 방출을 JSON Lines로 남긴다.

pub mod runner;
pub mod sink;
pub mod trace;

pub use runner::{replay, ReplaySummary};
pub use sink::{EmissionLine, JsonLinesSink};
pub use trace::{Trace, TraceEvent};
