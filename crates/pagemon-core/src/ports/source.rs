//! 관측 소스 포트.
//!
//! 원시 엔트리를 실제로 얻는 방법은 플랫폼마다 다르므로 엔진 밖에 둔다.
//! 구현: `pagemon-engine::source::InMemorySource` (테스트·리플레이용)

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreError;
use crate::models::entry::{ConnectionInfo, NavigationTimingEntry, ObservationType, PerformanceEntry};

/// 관측 콜백. 한 번 호출에 순서가 보존된 엔트리 목록이 전달된다.
pub type EntryHandler = Arc<dyn Fn(&[PerformanceEntry]) + Send + Sync>;

/// 구독 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// 브라우저 관측 메커니즘
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// 관측 메커니즘 사용 가능 여부. false면 세션 전체가 비활성.
    fn is_supported(&self) -> bool;

    /// 페이지가 백그라운드 상태로 시작했는지 여부
    fn initially_hidden(&self) -> bool;

    /// 내비게이션 타이밍 엔트리 (없으면 None)
    fn navigation_entry(&self) -> Option<NavigationTimingEntry>;

    /// 네트워크 연결 정보 (플랫폼이 노출하지 않으면 None)
    fn connection_info(&self) -> Option<ConnectionInfo>;

    /// 관측 유형 구독. 이미 버퍼된 엔트리도 전달될 수 있다.
    fn observe(
        &self,
        observation: ObservationType,
        handler: EntryHandler,
    ) -> Result<SubscriptionId, CoreError>;

    /// 구독 해제. 존재하던 구독이면 true.
    fn unobserve(&self, id: SubscriptionId) -> bool;

    /// 첫 지속 상호작용 가능 시각 (1회성 비동기 완료)
    async fn time_to_interactive(&self) -> Result<f64, CoreError>;
}
