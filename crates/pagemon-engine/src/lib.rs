//! # pagemon-engine
//!
//! 지표 집계·점수 엔진.
//! 비동기로 도착하는 원시 성능 엔트리를 가시성으로 걸러내고, 정규화·점수화한 뒤
//! 종류별 최신값 하나만 남기는 집계 스냅샷에 병합해 싱크로 전달한다.
//!
//! ## 구성
//!
//! - [`visibility`]: 숨김 시각 게이트 (원자적 최소값)
//! - [`long_task`]: 롱 태스크 블로킹 시간 누적기
//! - [`score`]: 임계값 테이블과 등급 분류
//! - [`normalize`]: 엔트리 → 지표 레코드 정규화 (LCP 2단계 방출 포함)
//! - [`store`]: 집계 저장소
//! - [`dispatch`]: 레이블 변환, 병합, 싱크 호출, 진단 미러
//! - [`session`]: 세션 컨텍스트와 구독 수명 관리
//! - [`span`]: 수동 구간 측정 (측정 전용 방출)
//! - [`source`], [`timeline`]: 인메모리 어댑터

pub mod dispatch;
pub mod long_task;
pub mod normalize;
pub mod score;
pub mod session;
pub mod source;
pub mod span;
pub mod store;
pub mod timeline;
pub mod visibility;

pub use dispatch::{DiagnosticMirror, Dispatcher, Emission};
pub use session::{MonitorSession, SessionContext};
pub use source::InMemorySource;
pub use span::SpanRecorder;
pub use timeline::InMemoryTimeline;
