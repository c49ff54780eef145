//! 대시보드 컨텍스트 제공 포트.

use crate::models::context::DashboardContextSnapshot;

/// 읽기 전용 대시보드 상태 제공자
///
/// AI 요청마다 새로 조회한다. 상태를 아직 볼 수 없으면 None.
pub trait DashboardContextSource: Send + Sync {
    fn snapshot(&self) -> Option<DashboardContextSnapshot>;
}
