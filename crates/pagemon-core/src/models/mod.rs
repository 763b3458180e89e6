//! PAGEMON 도메인 모델.
//!
//! 호스트가 밀어 넣는 원시 엔트리와 엔진이 만들어 내는 정규화 레코드를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod entry;
pub mod metric;
pub mod record;
pub mod snapshot;
pub mod span;
